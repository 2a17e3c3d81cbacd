//! Disaster finders

use chrono::NaiveDate;

use super::Store;
use crate::core::error::LedgerResult;
use crate::core::filter::{Conjunction, Criterion, DisasterFilter};
use crate::entities::Disaster;

impl Store {
    /// Disasters matching every criterion present in `filter`
    pub fn search_disasters(&self, filter: &DisasterFilter) -> LedgerResult<Vec<Disaster>> {
        self.select(&filter.compose())
    }

    /// Name contains `fragment`, ignoring case
    pub fn disasters_by_name(&self, fragment: &str) -> LedgerResult<Vec<Disaster>> {
        self.search_disasters(&DisasterFilter::new().name(fragment))
    }

    /// Location contains `fragment`, ignoring case
    pub fn disasters_by_location(&self, fragment: &str) -> LedgerResult<Vec<Disaster>> {
        self.search_disasters(&DisasterFilter::new().location(fragment))
    }

    /// Occurred within `[start, end]`; empty when `start > end`
    pub fn disasters_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LedgerResult<Vec<Disaster>> {
        self.search_disasters(&DisasterFilter::new().start_date(start).end_date(end))
    }

    /// Number of disasters that occurred strictly after `date`
    pub fn count_disasters_after(&self, date: NaiveDate) -> LedgerResult<u64> {
        let filter = Conjunction::new().and(Criterion::After {
            column: "occurred_on",
            date,
        });
        self.count_where::<Disaster>(&filter)
    }
}
