//! Format: optional per-class field schema used by the schema validator.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Documentation attached to a declared field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ClassField {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// The fields a class must and may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ClassSchema {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub mandatory_fields: BTreeMap<String, ClassField>,
    #[serde(default)]
    pub optional_fields: BTreeMap<String, ClassField>,
}

impl ClassSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mandatory(mut self, name: impl Into<String>) -> Self {
        self.mandatory_fields.insert(name.into(), ClassField::default());
        self
    }

    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.optional_fields.insert(name.into(), ClassField::default());
        self
    }

    /// Mandatory ∪ optional field names.
    pub fn allowed_fields(&self) -> HashSet<&str> {
        self.mandatory_fields
            .keys()
            .chain(self.optional_fields.keys())
            .map(String::as_str)
            .collect()
    }
}

/// Class → schema. Decoded from a document whose single top-level key is `Class`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Format {
    #[serde(rename = "Class", default)]
    pub classes: BTreeMap<String, ClassSchema>,
}

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: impl Into<String>, schema: ClassSchema) -> Self {
        self.classes.insert(class.into(), schema);
        self
    }

    pub fn get(&self, class: &str) -> Option<&ClassSchema> {
        self.classes.get(class)
    }

    /// Fold `other` into `self`. A class declared in both is a hard error and
    /// leaves `self` untouched.
    pub fn merge(&mut self, other: Format) -> Result<()> {
        if let Some(class) = other.classes.keys().find(|c| self.classes.contains_key(*c)) {
            return Err(Error::DuplicateClassFormat(class.clone()));
        }
        self.classes.extend(other.classes);
        Ok(())
    }
}
