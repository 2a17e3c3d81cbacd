//! Association records: create, fetch, list, delete and reverse lookups

use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension};
use tracing::{debug, info, warn};

use super::records::query_all;
use super::{conflict_on_duplicate, placeholders, Record, Store};
use crate::core::error::{LedgerError, LedgerResult};
use crate::core::filter::{Conjunction, Criterion};
use crate::core::identity::EntityId;
use crate::core::integrity;
use crate::core::links::{Association, CompositeKey, DonationDonor, LinksDonor, LinksProduct};
use crate::entities::{Donation, Donor};

impl Store {
    /// Write a new association after checking every endpoint exists
    pub fn link<A: Association>(&mut self, link: &A) -> LedgerResult<()> {
        let key = link.key();
        link.validate().map_err(|e| {
            warn!(kind = A::KIND, %key, error = %e, "rejecting invalid link");
            LedgerError::from(e)
        })?;

        self.write(|tx| {
            integrity::verify(tx, &key.references())?;

            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                A::TABLE,
                A::COLUMNS.join(", "),
                placeholders(A::COLUMNS.len())
            );
            tx.execute(&sql, params_from_iter(link.values()))
                .map_err(|e| conflict_on_duplicate(e, A::KIND, key))?;
            Ok(())
        })?;

        info!(kind = A::KIND, %key, "linked");
        Ok(())
    }

    /// Fetch an association by its full key, NotFound when absent
    pub fn get_link<A: Association>(&self, key: &A::Key) -> LedgerResult<A> {
        self.find_link::<A>(key)?
            .ok_or_else(|| LedgerError::not_found(A::KIND, key))
    }

    pub fn find_link<A: Association>(&self, key: &A::Key) -> LedgerResult<Option<A>> {
        debug!(kind = A::KIND, %key, "get link");
        let (clause, params) = key_filter::<A>(key).where_clause();
        let sql = format!("SELECT {} FROM {}{}", A::COLUMNS.join(", "), A::TABLE, clause);
        let link = self
            .conn
            .query_row(&sql, params_from_iter(params), |row| A::from_row(row))
            .optional()?;
        Ok(link)
    }

    /// Every association of a kind, in insertion order
    pub fn list_links<A: Association>(&self) -> LedgerResult<Vec<A>> {
        self.select_links(&Conjunction::new())
    }

    /// Remove an association, NotFound when absent
    pub fn unlink<A: Association>(&mut self, key: &A::Key) -> LedgerResult<()> {
        let (clause, params) = key_filter::<A>(key).where_clause();
        let sql = format!("DELETE FROM {}{}", A::TABLE, clause);
        let removed = self.write(|tx| Ok(tx.execute(&sql, params_from_iter(params))?))?;
        if removed == 0 {
            return Err(LedgerError::not_found(A::KIND, key));
        }

        info!(kind = A::KIND, %key, "unlinked");
        Ok(())
    }

    /// Associations of a kind that belong to `donation`
    pub fn links_for_donation<A: Association>(&self, donation: &EntityId) -> LedgerResult<Vec<A>> {
        self.select_links(&Conjunction::new().and(Criterion::id("donation_id", donation)))
    }

    /// Associations of a kind that name `donor`
    pub fn links_for_donor<A: LinksDonor>(&self, donor: &EntityId) -> LedgerResult<Vec<A>> {
        self.select_links(&Conjunction::new().and(Criterion::id("donor_id", donor)))
    }

    /// Associations of a kind that name `product`
    pub fn links_for_product<A: LinksProduct>(&self, product: &EntityId) -> LedgerResult<Vec<A>> {
        self.select_links(&Conjunction::new().and(Criterion::id("product_id", product)))
    }

    /// Donors linked to `donation`; links to deleted donors are skipped
    pub fn donors_of_donation(&self, donation: &EntityId) -> LedgerResult<Vec<Donor>> {
        let sql = format!(
            "SELECT {} FROM donors e JOIN {} l ON l.donor_id = e.id \
             WHERE l.donation_id = ? ORDER BY l.rowid",
            qualified(Donor::COLUMNS),
            DonationDonor::TABLE
        );
        let params = vec![Value::Text(donation.to_string())];
        query_all(&self.conn, &sql, params, Donor::from_row)
    }

    /// Donations `donor` is linked to; links to deleted donations are skipped
    pub fn donations_of_donor(&self, donor: &EntityId) -> LedgerResult<Vec<Donation>> {
        let sql = format!(
            "SELECT {} FROM donations e JOIN {} l ON l.donation_id = e.id \
             WHERE l.donor_id = ? ORDER BY l.rowid",
            qualified(Donation::COLUMNS),
            DonationDonor::TABLE
        );
        let params = vec![Value::Text(donor.to_string())];
        query_all(&self.conn, &sql, params, Donation::from_row)
    }

    fn select_links<A: Association>(&self, filter: &Conjunction) -> LedgerResult<Vec<A>> {
        let (clause, params) = filter.where_clause();
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY rowid",
            A::COLUMNS.join(", "),
            A::TABLE,
            clause
        );
        debug!(kind = A::KIND, criteria = filter.len(), "select links");
        query_all(&self.conn, &sql, params, A::from_row)
    }
}

/// Equality on every key column
fn key_filter<A: Association>(key: &A::Key) -> Conjunction {
    <A::Key as CompositeKey>::COLUMNS
        .iter()
        .copied()
        .zip(key.ids())
        .fold(Conjunction::new(), |conj, (column, id)| {
            conj.and(Criterion::id(column, &id))
        })
}

/// `e.id, e.col, ...` for a joined select on alias `e`
fn qualified(columns: &[&str]) -> String {
    std::iter::once("id")
        .chain(columns.iter().copied())
        .map(|c| format!("e.{c} AS {c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;
    use crate::core::links::{
        DonationDonorKey, DonationDonorProduct, DonationDonorProductKey, DonationProduct,
        DonationProductKey,
    };
    use crate::entities::{Beneficiary, Disaster, Product};

    struct Graph {
        store: Store,
        donation: Donation,
        donor: Donor,
        product: Product,
    }

    fn graph() -> Graph {
        let mut store = Store::open_in_memory().unwrap();
        let disaster = Disaster::new("Enchente Norte");
        let beneficiary = Beneficiary::new("Abrigo Central");
        let donor = Donor::new("Cruz Vermelha");
        let product = Product::new("Cobertor").with_unit("un");
        store.insert(&disaster).unwrap();
        store.insert(&beneficiary).unwrap();
        store.insert(&donor).unwrap();
        store.insert(&product).unwrap();

        let donation = Donation::new(disaster.id, beneficiary.id).with_status("pending");
        store.insert(&donation).unwrap();

        Graph {
            store,
            donation,
            donor,
            product,
        }
    }

    #[test]
    fn test_link_get_list_unlink() {
        let Graph {
            mut store,
            donation,
            donor,
            ..
        } = graph();
        let link = DonationDonor::new(donation.id, donor.id);
        store.link(&link).unwrap();

        let key = DonationDonorKey::new(donation.id, donor.id);
        assert_eq!(store.get_link::<DonationDonor>(&key).unwrap(), link);
        assert_eq!(store.list_links::<DonationDonor>().unwrap(), vec![link]);

        store.unlink::<DonationDonor>(&key).unwrap();
        assert!(store
            .get_link::<DonationDonor>(&key)
            .unwrap_err()
            .is_not_found());
        assert!(store
            .unlink::<DonationDonor>(&key)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_duplicate_key_conflicts_and_first_survives() {
        let Graph {
            mut store,
            donation,
            product,
            ..
        } = graph();
        let first = DonationProduct::new(donation.id, product.id, 3);
        store.link(&first).unwrap();

        let err = store
            .link(&DonationProduct::new(donation.id, product.id, 9))
            .unwrap_err();
        assert!(err.is_conflict());

        let key = DonationProductKey::new(donation.id, product.id);
        assert_eq!(store.get_link::<DonationProduct>(&key).unwrap(), first);
    }

    #[test]
    fn test_missing_endpoint_is_validation() {
        let Graph {
            mut store,
            donation,
            product,
            ..
        } = graph();
        let ghost = EntityId::new(EntityPrefix::Dnr);
        let err = store
            .link(&DonationDonorProduct::new(donation.id, ghost, product.id, 2))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.list_links::<DonationDonorProduct>().unwrap().is_empty());
    }

    #[test]
    fn test_non_positive_quantity_is_validation() {
        let Graph {
            mut store,
            donation,
            product,
            ..
        } = graph();
        let err = store
            .link(&DonationProduct::new(donation.id, product.id, 0))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_reverse_lookups() {
        let Graph {
            mut store,
            donation,
            donor,
            product,
        } = graph();
        let contribution = DonationDonorProduct::new(donation.id, donor.id, product.id, 4);
        store.link(&contribution).unwrap();
        store
            .link(&DonationProduct::new(donation.id, product.id, 4))
            .unwrap();

        assert_eq!(
            store
                .links_for_donor::<DonationDonorProduct>(&donor.id)
                .unwrap(),
            vec![contribution.clone()]
        );
        assert_eq!(
            store
                .links_for_product::<DonationDonorProduct>(&product.id)
                .unwrap(),
            vec![contribution.clone()]
        );
        assert_eq!(
            store
                .links_for_donation::<DonationProduct>(&donation.id)
                .unwrap()
                .len(),
            1
        );
        assert!(store
            .links_for_donation::<DonationDonor>(&donation.id)
            .unwrap()
            .is_empty());

        let key = DonationDonorProductKey::new(donation.id, donor.id, product.id);
        assert_eq!(
            store.get_link::<DonationDonorProduct>(&key).unwrap(),
            contribution
        );
    }

    #[test]
    fn test_deleting_donor_keeps_links() {
        let Graph {
            mut store,
            donation,
            donor,
            ..
        } = graph();
        let link = DonationDonor::new(donation.id, donor.id);
        store.link(&link).unwrap();
        assert_eq!(
            store.donors_of_donation(&donation.id).unwrap(),
            vec![donor.clone()]
        );

        store.delete::<Donor>(&donor.id).unwrap();

        assert_eq!(
            store.links_for_donor::<DonationDonor>(&donor.id).unwrap(),
            vec![link.clone()]
        );
        assert_eq!(
            store
                .get_link::<DonationDonor>(&DonationDonorKey::new(donation.id, donor.id))
                .unwrap(),
            link
        );
        assert!(store.donors_of_donation(&donation.id).unwrap().is_empty());
    }

    #[test]
    fn test_donations_of_donor() {
        let Graph {
            mut store,
            donation,
            donor,
            ..
        } = graph();
        store
            .link(&DonationDonor::new(donation.id, donor.id))
            .unwrap();
        assert_eq!(store.donations_of_donor(&donor.id).unwrap(), vec![donation]);
    }
}
