//! Donation finders

use chrono::NaiveDate;
use rusqlite::types::Value;

use super::records::query_all;
use super::Store;
use crate::core::error::LedgerResult;
use crate::core::filter::{date_value, Conjunction, Criterion, DonationFilter};
use crate::core::identity::EntityId;
use crate::entities::Donation;

impl Store {
    /// Donations matching every criterion present in `filter`
    pub fn search_donations(&self, filter: &DonationFilter) -> LedgerResult<Vec<Donation>> {
        self.select(&filter.compose())
    }

    /// Number of donations whose status is exactly `status`
    pub fn count_donations_by_status(&self, status: &str) -> LedgerResult<u64> {
        self.count_where::<Donation>(&Conjunction::new().and(Criterion::equals("status", status)))
    }

    /// Donations for `beneficiary` whose disaster occurred strictly after `date`
    ///
    /// Donations whose disaster has been deleted or has no date are skipped.
    pub fn donation_ids_for_beneficiary_after(
        &self,
        beneficiary: &EntityId,
        date: NaiveDate,
    ) -> LedgerResult<Vec<EntityId>> {
        let sql = "SELECT d.id FROM donations d \
                   JOIN disasters s ON s.id = d.disaster_id \
                   WHERE d.beneficiary_id = ? AND s.occurred_on > ? \
                   ORDER BY d.rowid";
        let params = vec![Value::Text(beneficiary.to_string()), date_value(&date)];
        query_all(&self.conn, sql, params, |row| row.get(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LedgerError;
    use crate::core::identity::EntityPrefix;
    use crate::entities::{Beneficiary, Disaster};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    struct Fixture {
        store: Store,
        june: Disaster,
        july: Disaster,
        ana: Beneficiary,
        bia: Beneficiary,
    }

    fn fixture() -> Fixture {
        let mut store = Store::open_in_memory().unwrap();
        let june = Disaster::new("Enchente Norte").with_date(d(2025, 6, 1));
        let july = Disaster::new("Incêndio Sul").with_date(d(2025, 7, 1));
        let ana = Beneficiary::new("Ana");
        let bia = Beneficiary::new("Bia");
        store.insert(&june).unwrap();
        store.insert(&july).unwrap();
        store.insert(&ana).unwrap();
        store.insert(&bia).unwrap();
        Fixture {
            store,
            june,
            july,
            ana,
            bia,
        }
    }

    #[test]
    fn test_missing_beneficiary_rejects_and_persists_nothing() {
        let Fixture { mut store, june, .. } = fixture();
        let ghost = EntityId::new(EntityPrefix::Ben);

        let err = store
            .insert(&Donation::new(june.id, ghost).with_status("pending"))
            .unwrap_err();
        match err {
            LedgerError::Validation(v) => assert_eq!(v.missing_ids(), vec![ghost]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.count::<Donation>().unwrap(), 0);
    }

    #[test]
    fn test_update_checks_references() {
        let Fixture {
            mut store,
            june,
            ana,
            ..
        } = fixture();
        let mut don = Donation::new(june.id, ana.id);
        store.insert(&don).unwrap();

        don.disaster_id = EntityId::new(EntityPrefix::Dis);
        assert!(store.update(&don).unwrap_err().is_validation());
        assert_eq!(
            store.get::<Donation>(&don.id).unwrap().disaster_id,
            june.id
        );
    }

    #[test]
    fn test_search_and_count() {
        let Fixture {
            mut store,
            june,
            july,
            ana,
            bia,
        } = fixture();
        let a = Donation::new(june.id, ana.id).with_status("pending");
        let b = Donation::new(july.id, ana.id).with_status("delivered");
        let c = Donation::new(july.id, bia.id).with_status("pending");
        for don in [&a, &b, &c] {
            store.insert(don).unwrap();
        }

        assert_eq!(
            store
                .search_donations(&DonationFilter::new().disaster(july.id))
                .unwrap(),
            vec![b.clone(), c.clone()]
        );
        assert_eq!(
            store
                .search_donations(&DonationFilter::new().beneficiary(ana.id).status("pending"))
                .unwrap(),
            vec![a.clone()]
        );
        assert_eq!(
            store
                .search_donations(&DonationFilter::new().disaster(july.id).status("pending"))
                .unwrap(),
            vec![c]
        );
        assert_eq!(store.search_donations(&DonationFilter::new()).unwrap().len(), 3);
        assert_eq!(store.count_donations_by_status("pending").unwrap(), 2);
        assert_eq!(store.count_donations_by_status("lost").unwrap(), 0);
    }

    #[test]
    fn test_ids_for_beneficiary_after() {
        let Fixture {
            mut store,
            june,
            july,
            ana,
            bia,
        } = fixture();
        let early = Donation::new(june.id, ana.id);
        let late = Donation::new(july.id, ana.id);
        let other = Donation::new(july.id, bia.id);
        for don in [&early, &late, &other] {
            store.insert(don).unwrap();
        }

        assert_eq!(
            store
                .donation_ids_for_beneficiary_after(&ana.id, d(2025, 6, 1))
                .unwrap(),
            vec![late.id]
        );
        assert_eq!(
            store
                .donation_ids_for_beneficiary_after(&ana.id, d(2025, 1, 1))
                .unwrap(),
            vec![early.id, late.id]
        );
    }

    #[test]
    fn test_deleting_disaster_leaves_donation() {
        let Fixture {
            mut store,
            june,
            ana,
            ..
        } = fixture();
        let don = Donation::new(june.id, ana.id);
        store.insert(&don).unwrap();

        store.delete::<Disaster>(&june.id).unwrap();
        assert_eq!(store.get::<Donation>(&don.id).unwrap(), don);
    }
}
