//! Relationship (edge) in the written graph.

use serde::{Deserialize, Serialize};

use super::{Fields, NodeKey, Reference};

/// Which way an edge derived from a reference points, relative to the record
/// that owns the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

impl Direction {
    /// Neither hint, or `RelationshipTo` alone, keeps the default outgoing edge.
    pub fn of(reference: &Reference) -> Self {
        match (reference.relationship_from, reference.relationship_to) {
            (true, true) => Direction::Both,
            (true, false) => Direction::Incoming,
            (false, _) => Direction::Outgoing,
        }
    }
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub src: NodeKey,
    pub dst: NodeKey,
    pub rel_type: String,
    pub properties: Fields,
}

impl Relationship {
    pub fn new(src: NodeKey, dst: NodeKey, rel_type: impl Into<String>) -> Self {
        Self {
            src,
            dst,
            rel_type: rel_type.into(),
            properties: Fields::new(),
        }
    }

    /// Edges a reference owned by `owner` turns into: one, or two when bidirectional.
    pub fn from_reference(owner: &NodeKey, reference: &Reference) -> Vec<Relationship> {
        let target = NodeKey::new(&reference.class, &reference.id);
        let edge = |src: &NodeKey, dst: &NodeKey| Relationship {
            properties: reference.fields.clone(),
            ..Relationship::new(src.clone(), dst.clone(), &reference.relationship)
        };
        match Direction::of(reference) {
            Direction::Outgoing => vec![edge(owner, &target)],
            Direction::Incoming => vec![edge(&target, owner)],
            Direction::Both => vec![edge(owner, &target), edge(&target, owner)],
        }
    }

    /// The "other" end of the relationship from the given node.
    pub fn other_node(&self, from: &NodeKey) -> Option<&NodeKey> {
        if *from == self.src { Some(&self.dst) }
        else if *from == self.dst { Some(&self.src) }
        else { None }
    }
}
