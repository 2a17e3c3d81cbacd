//! Typed failure outcomes for ledger operations
//!
//! Callers distinguish three client-facing outcomes:
//! - [`LedgerError::Validation`] - the request itself is malformed (blank name,
//!   non-positive quantity, a payload referencing something that does not exist)
//! - [`LedgerError::NotFound`] - the primary resource addressed by its own id is absent
//! - [`LedgerError::Conflict`] - a record with the same key already exists

use miette::Diagnostic;
use thiserror::Error;

use crate::core::identity::EntityId;
use crate::core::integrity::Reference;

/// Result alias for ledger operations
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Errors returned by the entity store and its collaborators
#[derive(Debug, Error, Diagnostic)]
pub enum LedgerError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {key}")]
    #[diagnostic(
        code(relief::not_found),
        help("check the id with the matching `list` command")
    )]
    NotFound { kind: &'static str, key: String },

    #[error("{kind} already exists: {key}")]
    #[diagnostic(code(relief::conflict))]
    Conflict { kind: &'static str, key: String },

    #[error("storage error: {0}")]
    #[diagnostic(code(relief::storage))]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    #[diagnostic(code(relief::io))]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        LedgerError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn conflict(kind: &'static str, key: impl ToString) -> Self {
        LedgerError::Conflict {
            kind,
            key: key.to_string(),
        }
    }

    /// True for client-input errors (bad request)
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, LedgerError::Conflict { .. })
    }
}

/// Malformed input detected before anything is written
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind}.{field} must not be blank")]
    #[diagnostic(code(relief::validation::blank_field))]
    BlankField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("{kind} quantity must be positive, got {quantity}")]
    #[diagnostic(code(relief::validation::quantity))]
    NonPositiveQuantity { kind: &'static str, quantity: i64 },

    #[error("request references missing records: {}", format_references(.0))]
    #[diagnostic(
        code(relief::validation::missing_reference),
        help("create the referenced records first")
    )]
    MissingReferences(Vec<Reference>),
}

impl ValidationError {
    /// Ids named by a missing-reference failure
    pub fn missing_ids(&self) -> Vec<EntityId> {
        match self {
            ValidationError::MissingReferences(refs) => refs.iter().map(|r| r.id).collect(),
            _ => Vec::new(),
        }
    }
}

fn format_references(refs: &[Reference]) -> String {
    refs.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reject blank required text fields
pub fn require_text(
    kind: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::BlankField { kind, field })
    } else {
        Ok(())
    }
}

/// Reject zero or negative quantities
pub fn require_positive(kind: &'static str, quantity: i64) -> Result<(), ValidationError> {
    if quantity > 0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveQuantity { kind, quantity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;

    #[test]
    fn test_require_text() {
        assert!(require_text("disaster", "name", "Flood").is_ok());
        assert_eq!(
            require_text("disaster", "name", "   "),
            Err(ValidationError::BlankField {
                kind: "disaster",
                field: "name"
            })
        );
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("donation product", 1).is_ok());
        assert!(require_positive("donation product", 0).is_err());
        assert!(require_positive("donation product", -4).is_err());
    }

    #[test]
    fn test_missing_reference_message_names_ids() {
        let id = EntityId::new(EntityPrefix::Ben);
        let err = ValidationError::MissingReferences(vec![Reference::new(EntityPrefix::Ben, id)]);
        assert!(err.to_string().contains(&id.to_string()));
        assert_eq!(err.missing_ids(), vec![id]);
    }

    #[test]
    fn test_error_classification() {
        let err = LedgerError::not_found("disaster", "DIS-x");
        assert!(err.is_not_found());
        assert!(!err.is_validation());

        let err: LedgerError = ValidationError::BlankField {
            kind: "product",
            field: "name",
        }
        .into();
        assert!(err.is_validation());
        assert!(LedgerError::conflict("donation product", "k").is_conflict());
    }
}
