//! Product entity type - an item that can be donated

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::{require_text, ValidationError};
use crate::core::filter::Filterable;
use crate::core::identity::{EntityId, EntityPrefix};

/// A Product entity
///
/// Names are expected to be distinct but the store does not enforce it;
/// use `Store::insert_unique_product` when that matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: EntityId,

    /// Product name (required)
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit of measure (e.g., "un", "kg")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Product {
    /// Create a new product with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Prd),
            name: name.into(),
            description: None,
            unit: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

impl Entity for Product {
    const PREFIX: EntityPrefix = EntityPrefix::Prd;

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

impl Filterable for Product {
    fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        match column {
            "name" | "name_key" => Some(Cow::Borrowed(self.name.as_str())),
            "unit" => self.unit.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_creation() {
        let prd = Product::new("Cobertor Térmico").with_unit("un");
        assert!(prd.id.to_string().starts_with("PRD-"));
        assert_eq!(prd.unit.as_deref(), Some("un"));
        assert!(prd.validate().is_ok());
    }

    #[test]
    fn test_unit_is_exact_text() {
        let prd = Product::new("Arroz").with_unit("kg");
        assert_eq!(prd.text("unit").as_deref(), Some("kg"));
        assert_eq!(prd.text("missing"), None);
    }
}
