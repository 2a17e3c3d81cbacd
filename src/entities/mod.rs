//! Entity type definitions
//!
//! The ledger tracks five primary entity types:
//!
//! - [`Disaster`] - An event that donations respond to
//! - [`Beneficiary`] - Who receives a donation
//! - [`Donor`] - Who contributes to a donation
//! - [`Product`] - What gets donated
//! - [`Donation`] - Aid for one disaster delivered to one beneficiary
//!
//! Beneficiaries and donors share the same contact shape but are distinct
//! types with independent id spaces.

pub mod beneficiary;
pub mod disaster;
pub mod donation;
pub mod donor;
pub mod product;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

pub use beneficiary::Beneficiary;
pub use disaster::Disaster;
pub use donation::Donation;
pub use donor::Donor;
pub use product::Product;

use crate::core::entity::Entity;
use crate::core::filter::Filterable;
use crate::core::identity::EntityId;

/// Contact fields shared by beneficiaries and donors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Entities with a contact shape (beneficiaries and donors)
pub trait Party: Entity + Filterable {
    fn name(&self) -> &str;
    fn organization(&self) -> Option<&str>;
    fn email(&self) -> Option<&str>;
    fn phone(&self) -> Option<&str>;
    fn address(&self) -> Option<&str>;

    /// Build from an id and contact fields
    fn from_parts(id: EntityId, contact: Contact) -> Self;

    /// Build with a fresh id
    fn from_contact(contact: Contact) -> Self
    where
        Self: Sized,
    {
        Self::from_parts(EntityId::new(Self::PREFIX), contact)
    }

    /// Column lookup shared by both party kinds
    fn party_text(&self, column: &str) -> Option<Cow<'_, str>> {
        let value = match column {
            "name" | "name_key" => Some(self.name()),
            "organization" | "organization_key" => self.organization(),
            "email" => self.email(),
            "phone" => self.phone(),
            "address" => self.address(),
            _ => None,
        };
        value.map(Cow::Borrowed)
    }
}
