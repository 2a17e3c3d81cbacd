//! Quantity sums over quantified associations
//!
//! The sum over an empty set is zero. Totals over [`DonationProduct`] and
//! [`DonationDonorProduct`] are independent; nothing reconciles them.
//!
//! [`DonationProduct`]: crate::core::links::DonationProduct

use rusqlite::params_from_iter;
use tracing::debug;

use super::Store;
use crate::core::error::LedgerResult;
use crate::core::filter::{Conjunction, Criterion};
use crate::core::identity::EntityId;
use crate::core::links::{DonationDonorProduct, LinksProduct, Quantified};

impl Store {
    /// Total quantity of `product` across every record of kind `A`
    pub fn sum_quantity_by_product<A: Quantified + LinksProduct>(
        &self,
        product: &EntityId,
    ) -> LedgerResult<i64> {
        self.sum_quantity::<A>(&Conjunction::new().and(Criterion::id("product_id", product)))
    }

    /// Total quantity recorded against `donation` in records of kind `A`
    pub fn sum_quantity_by_donation<A: Quantified>(&self, donation: &EntityId) -> LedgerResult<i64> {
        self.sum_quantity::<A>(&Conjunction::new().and(Criterion::id("donation_id", donation)))
    }

    /// Total quantity of `product` contributed by `donor`, over all donations
    pub fn sum_quantity_by_donor_and_product(
        &self,
        donor: &EntityId,
        product: &EntityId,
    ) -> LedgerResult<i64> {
        let filter = Conjunction::new()
            .and(Criterion::id("donor_id", donor))
            .and(Criterion::id("product_id", product));
        self.sum_quantity::<DonationDonorProduct>(&filter)
    }

    fn sum_quantity<A: Quantified>(&self, filter: &Conjunction) -> LedgerResult<i64> {
        let (clause, params) = filter.where_clause();
        let sql = format!("SELECT COALESCE(SUM(quantity), 0) FROM {}{}", A::TABLE, clause);
        let total: i64 = self
            .conn
            .query_row(&sql, params_from_iter(params), |row| row.get(0))?;
        debug!(kind = A::KIND, total, "sum quantity");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::links::DonationProduct;
    use crate::entities::{Beneficiary, Disaster, Donation, Donor, Product};

    struct Ledger {
        store: Store,
        donations: Vec<Donation>,
        donor: Donor,
        other_donor: Donor,
        product: Product,
    }

    fn ledger() -> Ledger {
        let mut store = Store::open_in_memory().unwrap();
        let disaster = Disaster::new("Enchente Norte");
        let beneficiary = Beneficiary::new("Abrigo Central");
        store.insert(&disaster).unwrap();
        store.insert(&beneficiary).unwrap();

        let donations: Vec<_> = (0..3)
            .map(|_| Donation::new(disaster.id, beneficiary.id))
            .collect();
        for don in &donations {
            store.insert(don).unwrap();
        }

        let donor = Donor::new("Cruz Vermelha");
        let other_donor = Donor::new("Cáritas");
        let product = Product::new("Cobertor");
        store.insert(&donor).unwrap();
        store.insert(&other_donor).unwrap();
        store.insert(&product).unwrap();

        Ledger {
            store,
            donations,
            donor,
            other_donor,
            product,
        }
    }

    #[test]
    fn test_empty_sums_are_zero() {
        let Ledger {
            store,
            donations,
            donor,
            product,
            ..
        } = ledger();
        assert_eq!(
            store
                .sum_quantity_by_product::<DonationDonorProduct>(&product.id)
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .sum_quantity_by_product::<DonationProduct>(&product.id)
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .sum_quantity_by_donation::<DonationProduct>(&donations[0].id)
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .sum_quantity_by_donor_and_product(&donor.id, &product.id)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_ternary_sums() {
        let Ledger {
            mut store,
            donations,
            donor,
            other_donor,
            product,
        } = ledger();
        store
            .link(&DonationDonorProduct::new(donations[0].id, donor.id, product.id, 3))
            .unwrap();
        store
            .link(&DonationDonorProduct::new(donations[1].id, donor.id, product.id, 5))
            .unwrap();
        store
            .link(&DonationDonorProduct::new(
                donations[2].id,
                other_donor.id,
                product.id,
                100,
            ))
            .unwrap();

        assert_eq!(
            store
                .sum_quantity_by_donor_and_product(&donor.id, &product.id)
                .unwrap(),
            8
        );
        assert_eq!(
            store
                .sum_quantity_by_product::<DonationDonorProduct>(&product.id)
                .unwrap(),
            108
        );
        assert_eq!(
            store
                .sum_quantity_by_donation::<DonationDonorProduct>(&donations[2].id)
                .unwrap(),
            100
        );
    }

    #[test]
    fn test_binary_and_ternary_totals_are_independent() {
        let Ledger {
            mut store,
            donations,
            donor,
            product,
            ..
        } = ledger();
        store
            .link(&DonationProduct::new(donations[0].id, product.id, 10))
            .unwrap();
        store
            .link(&DonationDonorProduct::new(donations[0].id, donor.id, product.id, 3))
            .unwrap();

        assert_eq!(
            store
                .sum_quantity_by_donation::<DonationProduct>(&donations[0].id)
                .unwrap(),
            10
        );
        assert_eq!(
            store
                .sum_quantity_by_product::<DonationProduct>(&product.id)
                .unwrap(),
            10
        );
        assert_eq!(
            store
                .sum_quantity_by_product::<DonationDonorProduct>(&product.id)
                .unwrap(),
            3
        );
    }
}
