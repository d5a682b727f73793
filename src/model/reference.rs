//! Reference: an intended edge from the owning record to another record.

use serde::{Deserialize, Serialize};

use super::{Fields, Value};

/// A typed, optionally directional relationship to `(class, id)`.
///
/// `relationship_from` and `relationship_to` are independent hints:
/// neither set means the default direction, both set means bidirectional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reference {
    pub class: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub relationship_from: bool,
    #[serde(default)]
    pub relationship_to: bool,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub fields: Fields,
}

impl Reference {
    pub fn new(
        class: impl Into<String>,
        id: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            id: id.into(),
            relationship: relationship.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Mark the reference as pointing from the target back to the owner.
    pub fn from_target(mut self) -> Self {
        self.relationship_from = true;
        self
    }

    /// Mark the reference as pointing from the owner to the target.
    pub fn to_target(mut self) -> Self {
        self.relationship_to = true;
        self
    }

    /// The `(class, id)` pair this reference resolves against.
    pub fn target(&self) -> (&str, &str) {
        (&self.class, &self.id)
    }
}
