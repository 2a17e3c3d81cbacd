//! Disaster entity type - an event that donations respond to

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::{require_text, ValidationError};
use crate::core::filter::Filterable;
use crate::core::identity::{EntityId, EntityPrefix};

/// A Disaster entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disaster {
    /// Unique identifier
    pub id: EntityId,

    /// Disaster name (required)
    pub name: String,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where it happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// When it happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_on: Option<NaiveDate>,
}

impl Disaster {
    /// Create a new disaster with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Dis),
            name: name.into(),
            description: None,
            location: None,
            occurred_on: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_date(mut self, occurred_on: NaiveDate) -> Self {
        self.occurred_on = Some(occurred_on);
        self
    }
}

impl Entity for Disaster {
    const PREFIX: EntityPrefix = EntityPrefix::Dis;

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

impl Filterable for Disaster {
    fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        match column {
            "name" | "name_key" => Some(Cow::Borrowed(self.name.as_str())),
            "location" | "location_key" => self.location.as_deref().map(Cow::Borrowed),
            "description" => self.description.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }

    fn date(&self, column: &str) -> Option<NaiveDate> {
        match column {
            "occurred_on" => self.occurred_on,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disaster_creation() {
        let dis = Disaster::new("Enchente Norte")
            .with_location("Recife")
            .with_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

        assert!(dis.id.to_string().starts_with("DIS-"));
        assert_eq!(dis.label(), "Enchente Norte");
        assert_eq!(dis.location.as_deref(), Some("Recife"));
        assert!(dis.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let dis = Disaster::new("  ");
        assert_eq!(
            dis.validate(),
            Err(ValidationError::BlankField {
                kind: "disaster",
                field: "name"
            })
        );
    }

    #[test]
    fn test_json_skips_absent_fields() {
        let dis = Disaster::new("Seca");
        let json = serde_json::to_string(&dis).unwrap();
        assert!(!json.contains("location"));
        let parsed: Disaster = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dis);
    }
}
