//! # graphdict: Definition Dictionary Builder
//!
//! Merges many small, nested YAML entity definitions into one flattened,
//! cross-document dictionary and checks it before anything is written to a
//! graph store or rendered.
//!
//! ## Pipeline
//!
//! 1. **Load**: walk source roots, decode each document into a `Specification`
//! 2. **Build**: flatten every specification into one shared `Dictionary`
//! 3. **Validate**: schema conformance, then referential integrity
//! 4. **Emit**: write to a `GraphSink`, or export Cypher / JSON
//!
//! No stage stops at the first defect. Builder and validators return a
//! `Report` of every issue found; only I/O returns `Err`.
//!
//! ## Quick Start
//!
//! ```rust
//! use graphdict::{merge, validate, Dictionary, Definition, Reference, Specification};
//!
//! let mut dict = Dictionary::new();
//! let people = Specification::new("Person")
//!     .with_reference(Reference::new("Band", "X", "Member"))
//!     .with_definition("Alice", Definition::new().with_field("Name", "Alice"));
//! let bands = Specification::new("Band")
//!     .with_definition("X", Definition::new().with_field("Name", "The X"));
//!
//! let mut issues = merge(people, &mut dict, None).count();
//! issues += merge(bands, &mut dict, None).count();
//! issues += validate(&dict, None).count();
//! assert_eq!(issues, 0);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod builder;
pub mod validate;
pub mod loader;
pub mod graph;
pub mod export;
pub mod config;
pub mod report;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    ClassSchema, Definition, Dictionary, DictionaryRecord, Fields, Format,
    Reference, Specification, Value,
};
pub use builder::{merge, merge_with, BuildOptions, Builder};
pub use validate::{validate, validate_references, validate_schema};
pub use loader::{load_dictionary, load_formats, LoadOutcome};
pub use graph::{write_dictionary, GraphSink, MemoryGraph};
pub use config::Config;
pub use report::{Issue, IssueKind, Report};

// ============================================================================
// Error Types
// ============================================================================

/// Fatal errors. These only come from I/O and decoding; merge and validation
/// problems are reported as [`Issue`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse YAML file [{}]: {source}", .path.display())]
    Yaml {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("field [{field}] of definition ID [{id}] in YAML file [{}] must be a scalar", .path.display())]
    NonScalarField {
        path: std::path::PathBuf,
        id: String,
        field: String,
    },

    #[error("no definitions found in YAML file [{}]", .0.display())]
    EmptyDocument(std::path::PathBuf),

    #[error("class {0} has already been declared")]
    DuplicateClassFormat(String),

    #[error("source directory [{}] not found", .0.display())]
    SourceNotFound(std::path::PathBuf),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
