//! Specification and Definition: the decoded shape of one source document.
//!
//! A `Specification` names a class, carries references broadcast to every
//! definition in it, and maps identities to `Definition`s. A `Definition`
//! may nest further specifications under a relationship name, to any depth.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Fields, Reference, Value};

/// A field whose value is loaded from a file next to the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileDefinition {
    pub path: PathBuf,
    #[serde(default)]
    pub prefix: String,
}

/// File-backed fields, keyed by the field name they populate.
pub type FileFields = BTreeMap<String, FileDefinition>;

/// One entity: its attributes, its own references and nested specifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Definition {
    #[serde(default)]
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub file_fields: FileFields,
    #[serde(default)]
    pub references: Vec<Reference>,
    /// Keyed by the relationship that links every nested record back here.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sub_definitions: BTreeMap<String, Specification>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn with_sub_definition(mut self, relationship: impl Into<String>, spec: Specification) -> Self {
        self.sub_definitions.insert(relationship.into(), spec);
        self
    }
}

/// The unit produced by decoding one source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Specification {
    /// Empty means "inherit from the enclosing definition".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, Definition>,
}

impl Specification {
    pub fn new(class: impl Into<String>) -> Self {
        Self { class: class.into(), ..Self::default() }
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn with_definition(mut self, id: impl Into<String>, definition: Definition) -> Self {
        self.definitions.insert(id.into(), definition);
        self
    }

    /// Total definitions in this specification and every nested one.
    pub fn definition_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(spec) = stack.pop() {
            count += spec.definitions.len();
            for definition in spec.definitions.values() {
                stack.extend(definition.sub_definitions.values());
            }
        }
        count
    }
}
