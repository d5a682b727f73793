//! # Document Model
//!
//! The recursive document shapes (`Specification` → `Definition` →
//! `Specification` …), the flattened `Dictionary` they merge into, the
//! optional per-class `Format`, and the node/edge types the graph writer
//! emits.
//!
//! Design rule: this module is pure data. No I/O, no logging.

pub mod value;
pub mod fields;
pub mod reference;
pub mod specification;
pub mod dictionary;
pub mod format;
pub mod node;
pub mod relationship;

pub use value::Value;
pub use fields::{fields, Fields};
pub use reference::Reference;
pub use specification::{Definition, FileDefinition, FileFields, Specification};
pub use dictionary::{ClassBucket, Dictionary, DictionaryRecord};
pub use format::{ClassField, ClassSchema, Format};
pub use node::{Node, NodeKey};
pub use relationship::{Direction, Relationship};
