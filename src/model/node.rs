//! Node in the written graph.

use serde::{Deserialize, Serialize};

use super::{Fields, Value};

/// Graph-side identity of a record: its class label plus its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub class: String,
    pub id: String,
}

impl NodeKey {
    pub fn new(class: impl Into<String>, id: impl Into<String>) -> Self {
        Self { class: class.into(), id: id.into() }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.class, self.id)
    }
}

/// A node: one dictionary record, labelled with its class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub key: NodeKey,
    pub properties: Fields,
}

impl Node {
    pub fn new(key: NodeKey) -> Self {
        Self { key, properties: Fields::new() }
    }

    pub fn label(&self) -> &str {
        &self.key.class
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
