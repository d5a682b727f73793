//! # Graph Writer
//!
//! Turns a validated [`Dictionary`] into node upserts and edge creations
//! against any [`GraphSink`].
//!
//! ## Implementations
//!
//! | Sink | Module | Description |
//! |------|--------|-------------|
//! | `MemoryGraph` | `memory` | In-memory graph for testing/embedding |
//!
//! Nodes are written first, so every edge can find both ends. Each node is
//! labelled with its class and carries an `ID` property equal to its identity.

pub mod memory;

use crate::model::*;
use crate::Result;

pub use memory::MemoryGraph;

/// Property holding a node's identity.
pub const ID_PROPERTY: &str = "ID";

/// The contract between the writer and a persistence engine.
pub trait GraphSink {
    /// Create the node if absent, then set every given property on it.
    fn upsert_node(&self, key: &NodeKey, properties: Fields) -> Result<()>;

    /// Create the edge unless an identical `(src, type, dst)` edge exists.
    /// Returns true if an edge was created.
    fn merge_edge(&self, edge: Relationship) -> Result<bool>;
}

/// What a write produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub nodes: usize,
    pub edges: usize,
    /// References skipped because their target record does not exist.
    pub dangling: usize,
}

/// Write every record as a node and every reference as one or two edges.
pub fn write_dictionary<S: GraphSink + ?Sized>(dict: &Dictionary, sink: &S) -> Result<WriteStats> {
    let mut stats = WriteStats::default();

    for (class, id, record) in dict.records() {
        let mut properties = record.fields.clone();
        properties.insert(ID_PROPERTY.to_string(), Value::from(id));
        sink.upsert_node(&NodeKey::new(class, id), properties)?;
        stats.nodes += 1;
    }

    for (class, id, record) in dict.records() {
        let owner = NodeKey::new(class, id);
        for reference in &record.references {
            if !dict.resolves(reference) {
                tracing::debug!(
                    "skipping edge [{}] from {owner} to missing {}[{}]",
                    reference.relationship, reference.class, reference.id
                );
                stats.dangling += 1;
                continue;
            }
            for edge in Relationship::from_reference(&owner, reference) {
                if sink.merge_edge(edge)? {
                    stats.edges += 1;
                }
            }
        }
    }

    tracing::info!(nodes = stats.nodes, edges = stats.edges, dangling = stats.dangling, "graph written");
    Ok(stats)
}
