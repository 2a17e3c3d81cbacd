//! Beneficiary and donor finders
//!
//! Both kinds share one set of finders, selected by type parameter:
//! `store.parties_by_name::<Donor>("cruz")`.

use super::{Record, Store};
use crate::core::error::LedgerResult;
use crate::core::filter::{Conjunction, Criterion};
use crate::entities::Party;

impl Store {
    /// First party whose email equals `email` exactly
    pub fn party_by_email<P: Party + Record>(&self, email: &str) -> LedgerResult<Option<P>> {
        let filter = Conjunction::new().and(Criterion::equals("email", email));
        Ok(self.select::<P>(&filter)?.into_iter().next())
    }

    /// Name contains `fragment`, ignoring case
    pub fn parties_by_name<P: Party + Record>(&self, fragment: &str) -> LedgerResult<Vec<P>> {
        self.select(&contains("name_key", fragment))
    }

    /// Organization contains `fragment`, ignoring case
    pub fn parties_by_organization<P: Party + Record>(
        &self,
        fragment: &str,
    ) -> LedgerResult<Vec<P>> {
        self.select(&contains("organization_key", fragment))
    }

    /// Whether any party of this kind has exactly this phone number
    pub fn party_phone_exists<P: Party + Record>(&self, phone: &str) -> LedgerResult<bool> {
        let filter = Conjunction::new().and(Criterion::equals("phone", phone));
        Ok(self.count_where::<P>(&filter)? > 0)
    }
}

/// Blank fragments impose no constraint
fn contains(column: &'static str, fragment: &str) -> Conjunction {
    if fragment.trim().is_empty() {
        Conjunction::new()
    } else {
        Conjunction::new().and(Criterion::contains(column, fragment))
    }
}
