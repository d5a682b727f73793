//! In-memory graph sink.
//!
//! The reference implementation of `GraphSink`, built on hash maps behind
//! `RwLock`s so a written graph can be shared and queried.
//!
//! ## Limitations
//!
//! - **No persistence**: the graph lives as long as the last handle.
//! - **Per-collection locks**: a node upsert and an edge merge are not
//!   atomic with respect to each other.

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;

use crate::model::*;
use crate::{Error, Result};
use super::GraphSink;

// ============================================================================
// MemoryGraph
// ============================================================================

/// In-memory property graph. Cloning shares the same graph.
#[derive(Clone, Default)]
pub struct MemoryGraph {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    nodes: RwLock<HashMap<NodeKey, Node>>,
    edges: RwLock<Vec<Relationship>>,
    /// node → indices into `edges` where it is the source
    outgoing: RwLock<HashMap<NodeKey, Vec<usize>>>,
    /// `(src, type, dst)` of every edge, for MERGE semantics
    edge_index: RwLock<HashSet<(NodeKey, String, NodeKey)>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.inner.nodes.read().len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edges.read().len()
    }

    pub fn node(&self, key: &NodeKey) -> Option<Node> {
        self.inner.nodes.read().get(key).cloned()
    }

    /// Nodes carrying `label`, ordered by identity.
    pub fn nodes_labelled(&self, label: &str) -> Vec<Node> {
        let mut nodes: Vec<Node> = self
            .inner
            .nodes
            .read()
            .values()
            .filter(|n| n.label() == label)
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.key.cmp(&b.key));
        nodes
    }

    /// Edges whose source is `key`, in creation order.
    pub fn edges_from(&self, key: &NodeKey) -> Vec<Relationship> {
        let outgoing = self.inner.outgoing.read();
        let edges = self.inner.edges.read();
        outgoing
            .get(key)
            .map(|idx| idx.iter().map(|&i| edges[i].clone()).collect())
            .unwrap_or_default()
    }

    /// Edges whose target is `key`, in creation order.
    pub fn edges_to(&self, key: &NodeKey) -> Vec<Relationship> {
        self.inner.edges.read().iter().filter(|e| e.dst == *key).cloned().collect()
    }

    /// Distinct node labels, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .inner
            .nodes
            .read()
            .keys()
            .map(|k| k.class.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        labels.sort();
        labels
    }

    /// Distinct relationship types, sorted.
    pub fn relationship_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .inner
            .edges
            .read()
            .iter()
            .map(|e| e.rel_type.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        types.sort();
        types
    }
}

// ============================================================================
// GraphSink impl
// ============================================================================

impl GraphSink for MemoryGraph {
    fn upsert_node(&self, key: &NodeKey, properties: Fields) -> Result<()> {
        let mut nodes = self.inner.nodes.write();
        let node = nodes.entry(key.clone()).or_insert_with(|| Node::new(key.clone()));
        node.properties.extend(properties);
        Ok(())
    }

    fn merge_edge(&self, edge: Relationship) -> Result<bool> {
        {
            let nodes = self.inner.nodes.read();
            for end in [&edge.src, &edge.dst] {
                if !nodes.contains_key(end) {
                    return Err(Error::Graph(format!("node {end} does not exist")));
                }
            }
        }

        let signature = (edge.src.clone(), edge.rel_type.clone(), edge.dst.clone());
        if !self.inner.edge_index.write().insert(signature) {
            return Ok(false);
        }

        let src = edge.src.clone();
        let idx = {
            let mut edges = self.inner.edges.write();
            edges.push(edge);
            edges.len() - 1
        };
        self.inner.outgoing.write().entry(src).or_default().push(idx);
        Ok(true)
    }
}
