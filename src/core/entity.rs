//! Entity trait - common interface for all primary record types

use serde::{de::DeserializeOwned, Serialize};

use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::integrity::ReferenceSet;

/// Common trait for disasters, beneficiaries, donors, products and donations
pub trait Entity: Serialize + DeserializeOwned {
    /// The entity type prefix (e.g., DIS, DON)
    const PREFIX: EntityPrefix;

    /// Get the entity's unique ID
    fn id(&self) -> &EntityId;

    /// Short human readable label for listings
    fn label(&self) -> &str;

    /// Check required fields before the entity is written
    fn validate(&self) -> Result<(), ValidationError>;

    /// Other records this entity must point at when written
    fn references(&self) -> ReferenceSet {
        ReferenceSet::new()
    }

    /// Human readable kind name
    fn kind() -> &'static str {
        Self::PREFIX.kind()
    }
}
