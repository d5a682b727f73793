//! JSON tree export: a nested view of the written graph, shaped by a
//! level configuration.
//!
//! ```yaml
//! Class: Category
//! NameField: Name
//! ChildLevel:
//!   - Class: Service
//!     NameField: Name
//!     DetailFields: [Description]
//!     ParentRelationship: InCategory
//! ```
//!
//! The top level takes every node of its class. A child level takes the
//! nodes of its class joined to the parent node by `ParentRelationship`,
//! whichever way the edge points.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::graph::{write_dictionary, MemoryGraph};
use crate::model::{Dictionary, Node, NodeKey, Value};
use crate::{Error, Result};

/// Colour of the synthetic root that holds the top-level nodes.
pub const ROOT_COLOUR: &str = "#4dc2ca";

/// One level of the tree configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct JsonLevel {
    pub class: String,
    /// Field copied into the node's `name`.
    #[serde(default)]
    pub name_field: String,
    #[serde(default)]
    pub colour: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub detail_fields: Vec<String>,
    /// Relationship joining this level to the level above. Unused at the top.
    #[serde(default)]
    pub parent_relationship: String,
    #[serde(default, rename = "ChildLevel")]
    pub child_levels: Vec<JsonLevel>,
}

impl JsonLevel {
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path).inspect_err(|e| {
            tracing::error!(error = %e, "could not open JSON configuration [{}]", path.display());
        })?;
        let level = Self::from_yaml(&yaml, path)?;
        tracing::debug!("successfully unmarshalled JSON configuration [{}]", path.display());
        Ok(level)
    }

    /// Decode strictly; unknown keys are rejected.
    pub fn from_yaml(yaml: &str, origin: &Path) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|source| Error::Yaml { path: origin.to_path_buf(), source })
    }
}

/// A node of the emitted tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TreeNode {
    pub class: String,
    pub name: String,
    pub colour: String,
    pub size: i64,
    pub detail_fields: BTreeMap<String, String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Write `dict` into a scratch graph and build the tree from it.
pub fn json_tree(dict: &Dictionary, levels: &[JsonLevel]) -> Result<TreeNode> {
    let graph = MemoryGraph::new();
    write_dictionary(dict, &graph)?;
    Ok(tree_from_graph(&graph, levels))
}

/// Build the tree from an already written graph. The root is synthetic:
/// no class, [`ROOT_COLOUR`], one child per top-level node.
pub fn tree_from_graph(graph: &MemoryGraph, levels: &[JsonLevel]) -> TreeNode {
    warn_unmatched(graph, levels);

    let children = levels
        .iter()
        .flat_map(|level| {
            graph
                .nodes_labelled(&level.class)
                .into_iter()
                .map(|node| expand(graph, level, &node))
                .collect::<Vec<_>>()
        })
        .collect();

    TreeNode { colour: ROOT_COLOUR.to_string(), children, ..TreeNode::default() }
}

fn expand(graph: &MemoryGraph, level: &JsonLevel, node: &Node) -> TreeNode {
    let name = node
        .get(&level.name_field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let detail_fields = level
        .detail_fields
        .iter()
        .filter_map(|field| match node.get(field)? {
            Value::Null => None,
            Value::String(s) => Some((field.clone(), s.clone())),
            other => Some((field.clone(), other.to_string())),
        })
        .collect();

    let children = level
        .child_levels
        .iter()
        .flat_map(|child| {
            joined(graph, &node.key, child)
                .into_iter()
                .filter_map(|key| graph.node(&key))
                .map(|child_node| expand(graph, child, &child_node))
                .collect::<Vec<_>>()
        })
        .collect();

    TreeNode {
        class: level.class.clone(),
        name,
        colour: level.colour.clone(),
        size: level.size,
        detail_fields,
        children,
    }
}

/// Nodes of `level.class` sharing a `level.parent_relationship` edge with
/// `parent`, in either direction, ordered by identity.
fn joined(graph: &MemoryGraph, parent: &NodeKey, level: &JsonLevel) -> BTreeSet<NodeKey> {
    graph
        .edges_from(parent)
        .into_iter()
        .chain(graph.edges_to(parent))
        .filter(|edge| edge.rel_type == level.parent_relationship)
        .filter_map(|edge| edge.other_node(parent).cloned())
        .filter(|key| key.class == level.class)
        .collect()
}

/// Log configuration entries that can never match anything in `graph`.
fn warn_unmatched(graph: &MemoryGraph, levels: &[JsonLevel]) {
    let labels = graph.labels();
    let types = graph.relationship_types();

    let mut pending: Vec<(&JsonLevel, bool)> = levels.iter().map(|l| (l, true)).collect();
    while let Some((level, top)) = pending.pop() {
        if !labels.contains(&level.class) {
            tracing::warn!("class [{}] in JSON configuration not found in graph", level.class);
        }
        if !top && !types.contains(&level.parent_relationship) {
            tracing::warn!(
                "relationship [{}] in JSON configuration not found in graph",
                level.parent_relationship
            );
        }
        pending.extend(level.child_levels.iter().map(|l| (l, false)));
    }
}
