//! Donation entity type - aid delivered to a beneficiary for a disaster

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::filter::Filterable;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::integrity::ReferenceSet;

/// A Donation entity
///
/// Its identity is independent of the disaster and beneficiary it points at;
/// both references are checked when the donation is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    /// Unique identifier
    pub id: EntityId,

    /// Disaster this donation responds to
    pub disaster_id: EntityId,

    /// Who receives the donation
    pub beneficiary_id: EntityId,

    /// Free-text status (e.g., "pending", "delivered")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Donation {
    /// Create a new donation with a fresh id
    pub fn new(disaster_id: EntityId, beneficiary_id: EntityId) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Don),
            disaster_id,
            beneficiary_id,
            status: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

impl Entity for Donation {
    const PREFIX: EntityPrefix = EntityPrefix::Don;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn references(&self) -> ReferenceSet {
        ReferenceSet::new()
            .with(EntityPrefix::Dis, self.disaster_id)
            .with(EntityPrefix::Ben, self.beneficiary_id)
    }
}

impl Filterable for Donation {
    fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        match column {
            "disaster_id" => Some(Cow::Owned(self.disaster_id.to_string())),
            "beneficiary_id" => Some(Cow::Owned(self.beneficiary_id.to_string())),
            "status" => self.status.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}
