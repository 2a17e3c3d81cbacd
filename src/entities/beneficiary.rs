//! Beneficiary entity type - a person or organization receiving donations

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::{require_text, ValidationError};
use crate::core::filter::Filterable;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::Party;

/// A Beneficiary entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    /// Unique identifier
    pub id: EntityId,

    /// Beneficiary name (required)
    pub name: String,

    /// Affiliated organization, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Beneficiary {
    /// Create a new beneficiary with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Ben),
            name: name.into(),
            organization: None,
            email: None,
            phone: None,
            address: None,
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl Entity for Beneficiary {
    const PREFIX: EntityPrefix = EntityPrefix::Ben;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::kind(), "name", &self.name)
    }
}

impl Party for Beneficiary {
    fn name(&self) -> &str {
        &self.name
    }

    fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    fn from_parts(id: EntityId, contact: crate::entities::Contact) -> Self {
        Self {
            id,
            name: contact.name,
            organization: contact.organization,
            email: contact.email,
            phone: contact.phone,
            address: contact.address,
        }
    }
}

impl Filterable for Beneficiary {
    fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        self.party_text(column)
    }
}
