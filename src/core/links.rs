//! Association records between donations, donors and products
//!
//! Each association is identified by a composite key made of the ids it
//! links. Keys compare structurally: two keys are equal iff every component
//! is equal. The store uses the key columns as the table's primary key, so
//! writing the same combination twice is a conflict.
//!
//! Capability traits ([`LinksDonor`], [`LinksProduct`], [`Quantified`])
//! restrict reverse lookups and sums to the association kinds that carry
//! the matching column.

use std::fmt;
use std::hash::Hash;

use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::error::{require_positive, ValidationError};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::integrity::ReferenceSet;

/// Identity of an association record
pub trait CompositeKey: Copy + Eq + Hash + fmt::Display + fmt::Debug {
    /// Key columns, in the order [`CompositeKey::ids`] returns them
    const COLUMNS: &'static [&'static str];

    /// Component ids in column order
    fn ids(&self) -> Vec<EntityId>;

    /// The (kind, id) pairs that must exist for this key to be written
    fn references(&self) -> ReferenceSet;
}

/// A row linking two or three primary records
pub trait Association: Serialize + Clone + fmt::Debug + Sized {
    /// Human readable kind name used in messages
    const KIND: &'static str;

    /// Table holding records of this kind
    const TABLE: &'static str;

    /// Every stored column, key columns first
    const COLUMNS: &'static [&'static str];

    type Key: CompositeKey;

    fn key(&self) -> Self::Key;

    fn donation_id(&self) -> EntityId;

    /// Check payload fields before the record is written
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Column values in [`Association::COLUMNS`] order
    fn values(&self) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Associations carrying a donor id
pub trait LinksDonor: Association {
    fn donor_id(&self) -> EntityId;
}

/// Associations carrying a product id
pub trait LinksProduct: Association {
    fn product_id(&self) -> EntityId;
}

/// Associations carrying a positive quantity
pub trait Quantified: Association {
    fn quantity(&self) -> i64;
}

fn id_value(id: EntityId) -> Value {
    Value::Text(id.to_string())
}

// ----------------------------------------------------------------------------
// Keys
// ----------------------------------------------------------------------------

/// Key of a [`DonationDonor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DonationDonorKey {
    pub donation_id: EntityId,
    pub donor_id: EntityId,
}

impl DonationDonorKey {
    pub fn new(donation_id: EntityId, donor_id: EntityId) -> Self {
        Self {
            donation_id,
            donor_id,
        }
    }
}

impl fmt::Display for DonationDonorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.donation_id, self.donor_id)
    }
}

impl CompositeKey for DonationDonorKey {
    const COLUMNS: &'static [&'static str] = &["donation_id", "donor_id"];

    fn ids(&self) -> Vec<EntityId> {
        vec![self.donation_id, self.donor_id]
    }

    fn references(&self) -> ReferenceSet {
        ReferenceSet::new()
            .with(EntityPrefix::Don, self.donation_id)
            .with(EntityPrefix::Dnr, self.donor_id)
    }
}

/// Key of a [`DonationProduct`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DonationProductKey {
    pub donation_id: EntityId,
    pub product_id: EntityId,
}

impl DonationProductKey {
    pub fn new(donation_id: EntityId, product_id: EntityId) -> Self {
        Self {
            donation_id,
            product_id,
        }
    }
}

impl fmt::Display for DonationProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.donation_id, self.product_id)
    }
}

impl CompositeKey for DonationProductKey {
    const COLUMNS: &'static [&'static str] = &["donation_id", "product_id"];

    fn ids(&self) -> Vec<EntityId> {
        vec![self.donation_id, self.product_id]
    }

    fn references(&self) -> ReferenceSet {
        ReferenceSet::new()
            .with(EntityPrefix::Don, self.donation_id)
            .with(EntityPrefix::Prd, self.product_id)
    }
}

/// Key of a [`DonationDonorProduct`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DonationDonorProductKey {
    pub donation_id: EntityId,
    pub donor_id: EntityId,
    pub product_id: EntityId,
}

impl DonationDonorProductKey {
    pub fn new(donation_id: EntityId, donor_id: EntityId, product_id: EntityId) -> Self {
        Self {
            donation_id,
            donor_id,
            product_id,
        }
    }
}

impl fmt::Display for DonationDonorProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.donation_id, self.donor_id, self.product_id
        )
    }
}

impl CompositeKey for DonationDonorProductKey {
    const COLUMNS: &'static [&'static str] = &["donation_id", "donor_id", "product_id"];

    fn ids(&self) -> Vec<EntityId> {
        vec![self.donation_id, self.donor_id, self.product_id]
    }

    fn references(&self) -> ReferenceSet {
        ReferenceSet::new()
            .with(EntityPrefix::Don, self.donation_id)
            .with(EntityPrefix::Dnr, self.donor_id)
            .with(EntityPrefix::Prd, self.product_id)
    }
}

// ----------------------------------------------------------------------------
// Records
// ----------------------------------------------------------------------------

/// "This donor contributed to this donation", without product detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationDonor {
    pub donation_id: EntityId,
    pub donor_id: EntityId,
}

impl DonationDonor {
    pub fn new(donation_id: EntityId, donor_id: EntityId) -> Self {
        Self {
            donation_id,
            donor_id,
        }
    }
}

impl Association for DonationDonor {
    const KIND: &'static str = "donation donor";
    const TABLE: &'static str = "donation_donors";
    const COLUMNS: &'static [&'static str] = &["donation_id", "donor_id"];

    type Key = DonationDonorKey;

    fn key(&self) -> DonationDonorKey {
        DonationDonorKey::new(self.donation_id, self.donor_id)
    }

    fn donation_id(&self) -> EntityId {
        self.donation_id
    }

    fn values(&self) -> Vec<Value> {
        vec![id_value(self.donation_id), id_value(self.donor_id)]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            donation_id: row.get("donation_id")?,
            donor_id: row.get("donor_id")?,
        })
    }
}

impl LinksDonor for DonationDonor {
    fn donor_id(&self) -> EntityId {
        self.donor_id
    }
}

/// Quantity of a product in a donation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationProduct {
    pub donation_id: EntityId,
    pub product_id: EntityId,
    pub quantity: i64,
}

impl DonationProduct {
    pub fn new(donation_id: EntityId, product_id: EntityId, quantity: i64) -> Self {
        Self {
            donation_id,
            product_id,
            quantity,
        }
    }
}

impl Association for DonationProduct {
    const KIND: &'static str = "donation product";
    const TABLE: &'static str = "donation_products";
    const COLUMNS: &'static [&'static str] = &["donation_id", "product_id", "quantity"];

    type Key = DonationProductKey;

    fn key(&self) -> DonationProductKey {
        DonationProductKey::new(self.donation_id, self.product_id)
    }

    fn donation_id(&self) -> EntityId {
        self.donation_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_positive(Self::KIND, self.quantity)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            id_value(self.donation_id),
            id_value(self.product_id),
            Value::Integer(self.quantity),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            donation_id: row.get("donation_id")?,
            product_id: row.get("product_id")?,
            quantity: row.get("quantity")?,
        })
    }
}

impl LinksProduct for DonationProduct {
    fn product_id(&self) -> EntityId {
        self.product_id
    }
}

impl Quantified for DonationProduct {
    fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// Quantity of a product one donor contributed to a donation
///
/// Finer grained than [`DonationProduct`]. The two are recorded
/// independently and their quantities are never reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationDonorProduct {
    pub donation_id: EntityId,
    pub donor_id: EntityId,
    pub product_id: EntityId,
    pub quantity: i64,
}

impl DonationDonorProduct {
    pub fn new(
        donation_id: EntityId,
        donor_id: EntityId,
        product_id: EntityId,
        quantity: i64,
    ) -> Self {
        Self {
            donation_id,
            donor_id,
            product_id,
            quantity,
        }
    }
}

impl Association for DonationDonorProduct {
    const KIND: &'static str = "donation donor product";
    const TABLE: &'static str = "donation_donor_products";
    const COLUMNS: &'static [&'static str] =
        &["donation_id", "donor_id", "product_id", "quantity"];

    type Key = DonationDonorProductKey;

    fn key(&self) -> DonationDonorProductKey {
        DonationDonorProductKey::new(self.donation_id, self.donor_id, self.product_id)
    }

    fn donation_id(&self) -> EntityId {
        self.donation_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_positive(Self::KIND, self.quantity)
    }

    fn values(&self) -> Vec<Value> {
        vec![
            id_value(self.donation_id),
            id_value(self.donor_id),
            id_value(self.product_id),
            Value::Integer(self.quantity),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            donation_id: row.get("donation_id")?,
            donor_id: row.get("donor_id")?,
            product_id: row.get("product_id")?,
            quantity: row.get("quantity")?,
        })
    }
}

impl LinksDonor for DonationDonorProduct {
    fn donor_id(&self) -> EntityId {
        self.donor_id
    }
}

impl LinksProduct for DonationDonorProduct {
    fn product_id(&self) -> EntityId {
        self.product_id
    }
}

impl Quantified for DonationDonorProduct {
    fn quantity(&self) -> i64 {
        self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_compare_structurally() {
        let don = EntityId::new(EntityPrefix::Don);
        let dnr = EntityId::new(EntityPrefix::Dnr);
        let prd = EntityId::new(EntityPrefix::Prd);

        let a = DonationDonorProductKey::new(don, dnr, prd);
        let b = DonationDonorProduct::new(don, dnr, prd, 7).key();
        assert_eq!(a, b);

        let other = DonationDonorProductKey::new(don, dnr, EntityId::new(EntityPrefix::Prd));
        assert_ne!(a, other);

        let set: HashSet<_> = [a, b, other].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_key_columns_line_up_with_ids() {
        let key = DonationProductKey::new(
            EntityId::new(EntityPrefix::Don),
            EntityId::new(EntityPrefix::Prd),
        );
        assert_eq!(DonationProductKey::COLUMNS.len(), key.ids().len());
        assert_eq!(
            &DonationProduct::COLUMNS[..DonationProductKey::COLUMNS.len()],
            DonationProductKey::COLUMNS
        );
    }

    #[test]
    fn test_key_display() {
        let don = EntityId::new(EntityPrefix::Don);
        let dnr = EntityId::new(EntityPrefix::Dnr);
        assert_eq!(
            DonationDonorKey::new(don, dnr).to_string(),
            format!("{don}/{dnr}")
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        let don = EntityId::new(EntityPrefix::Don);
        let prd = EntityId::new(EntityPrefix::Prd);
        assert!(DonationProduct::new(don, prd, 3).validate().is_ok());
        assert_eq!(
            DonationProduct::new(don, prd, 0).validate(),
            Err(ValidationError::NonPositiveQuantity {
                kind: "donation product",
                quantity: 0
            })
        );
        let dnr = EntityId::new(EntityPrefix::Dnr);
        assert!(DonationDonorProduct::new(don, dnr, prd, -1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_key_references_name_every_endpoint() {
        let key = DonationDonorProductKey::new(
            EntityId::new(EntityPrefix::Don),
            EntityId::new(EntityPrefix::Dnr),
            EntityId::new(EntityPrefix::Prd),
        );
        let kinds: Vec<_> = key.references().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityPrefix::Don, EntityPrefix::Dnr, EntityPrefix::Prd]
        );
    }
}
