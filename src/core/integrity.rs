//! Referential integrity gate
//!
//! Before a donation or an association record is written, every id it
//! references must resolve to an existing record of the expected kind.
//! A miss is the caller's fault, so it is reported as a
//! [`ValidationError::MissingReferences`], never as a not-found.
//!
//! The gate only checks at write time. Later deletes of referenced records
//! are neither blocked nor cascaded.

use std::fmt;

use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::warn;

use crate::core::error::{LedgerResult, ValidationError};
use crate::core::identity::{EntityId, EntityPrefix};

/// An (entity kind, id) pair that must exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub kind: EntityPrefix,
    pub id: EntityId,
}

impl Reference {
    pub fn new(kind: EntityPrefix, id: EntityId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.kind(), self.id)
    }
}

/// The set of references carried by a write request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    refs: Vec<Reference>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: EntityPrefix, id: EntityId) -> Self {
        self.refs.push(Reference::new(kind, id));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.refs.iter()
    }
}

/// Resolve every reference against its owning table.
///
/// Must run on the same transaction as the write it guards.
pub fn verify(conn: &Connection, refs: &ReferenceSet) -> LedgerResult<()> {
    let mut missing = Vec::new();

    for reference in refs.iter() {
        if !resolves(conn, reference)? {
            missing.push(*reference);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        warn!(
            missing = %missing.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", "),
            "rejecting write with unresolved references"
        );
        Err(ValidationError::MissingReferences(missing).into())
    }
}

fn resolves(conn: &Connection, reference: &Reference) -> LedgerResult<bool> {
    // An id of another kind can never resolve, whatever table it lives in
    if reference.id.prefix() != reference.kind {
        return Ok(false);
    }

    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)",
        reference.kind.table()
    );
    let exists: bool = conn.query_row(&sql, params![reference.id], |row| row.get(0))?;
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::Store;
    use crate::entities::{Beneficiary, Disaster};

    #[test]
    fn test_empty_set_passes() {
        let store = Store::open_in_memory().unwrap();
        assert!(verify(store.connection(), &ReferenceSet::new()).is_ok());
    }

    #[test]
    fn test_existing_references_pass() {
        let mut store = Store::open_in_memory().unwrap();
        let disaster = Disaster::new("Enchente Norte");
        let beneficiary = Beneficiary::new("Abrigo Central");
        store.insert(&disaster).unwrap();
        store.insert(&beneficiary).unwrap();

        let refs = ReferenceSet::new()
            .with(EntityPrefix::Dis, disaster.id)
            .with(EntityPrefix::Ben, beneficiary.id);
        assert!(verify(store.connection(), &refs).is_ok());
    }

    #[test]
    fn test_missing_references_are_all_reported() {
        let mut store = Store::open_in_memory().unwrap();
        let disaster = Disaster::new("Enchente Norte");
        store.insert(&disaster).unwrap();

        let ghost_ben = EntityId::new(EntityPrefix::Ben);
        let ghost_dnr = EntityId::new(EntityPrefix::Dnr);
        let refs = ReferenceSet::new()
            .with(EntityPrefix::Dis, disaster.id)
            .with(EntityPrefix::Ben, ghost_ben)
            .with(EntityPrefix::Dnr, ghost_dnr);

        let err = verify(store.connection(), &refs).unwrap_err();
        assert!(err.is_validation());
        match err {
            crate::core::error::LedgerError::Validation(v) => {
                assert_eq!(v.missing_ids(), vec![ghost_ben, ghost_dnr]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_kind_never_resolves() {
        let mut store = Store::open_in_memory().unwrap();
        let disaster = Disaster::new("Incêndio Sul");
        store.insert(&disaster).unwrap();

        // A disaster id passed where a beneficiary is expected
        let refs = ReferenceSet::new().with(EntityPrefix::Ben, disaster.id);
        assert!(verify(store.connection(), &refs).unwrap_err().is_validation());
    }
}
