//! # Document Loader
//!
//! Discovers definition documents under one or more source roots, decodes
//! each into a [`Specification`], resolves its file-backed fields, and feeds
//! it to a [`Builder`].
//!
//! A document that cannot be read, cannot be decoded, or decodes with no
//! definitions is skipped with a warning. It never stops the run.

pub mod files;
pub mod format;

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::builder::{BuildOptions, Builder};
use crate::model::{Dictionary, Specification};
use crate::report::Report;
use crate::{Error, Result};

pub use files::resolve_file_fields;
pub use format::{load_format, load_formats};

/// A document left out of the merge, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a multi-source load produces.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub dictionary: Dictionary,
    /// Merge-level issues (duplicate identities, depth overflow).
    pub report: Report,
    pub skipped: Vec<SkippedDocument>,
    /// Documents merged.
    pub loaded: usize,
}

/// Files under `root` whose name ends in `.<extension>`, sorted by path.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{extension}");
    let mut found = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            tracing::warn!(error = %e, "cannot process files in directory [{}]", root.display());
            match e.io_error() {
                Some(io) if io.kind() == std::io::ErrorKind::NotFound => Error::SourceNotFound(root.to_path_buf()),
                _ => Error::Walk(e),
            }
        })?;
        if entry.file_type().is_dir() {
            continue;
        }

        let matches = entry.file_name().to_str().is_some_and(|name| name.ends_with(&suffix));
        if matches {
            tracing::debug!("processing file [{}]", entry.path().display());
            found.push(entry.into_path());
        } else {
            tracing::debug!("ignoring file [{}]", entry.path().display());
        }
    }

    found.sort();
    Ok(found)
}

/// Decode a document from YAML text. `origin` only labels errors.
///
/// A list or mapping where a field value belongs is reported by field name
/// rather than as a generic decode error.
pub fn parse_specification(yaml: &str, origin: &Path) -> Result<Specification> {
    let spec: Specification = serde_yaml::from_str(yaml).map_err(|source| {
        match non_scalar_field(yaml) {
            Some((id, field)) => Error::NonScalarField { path: origin.to_path_buf(), id, field },
            None => Error::Yaml { path: origin.to_path_buf(), source },
        }
    })?;

    if spec.definitions.is_empty() {
        return Err(Error::EmptyDocument(origin.to_path_buf()));
    }
    Ok(spec)
}

/// The first `(identity, field)` whose value under `Fields` is a sequence or
/// mapping, searching nested `SubDefinitions` too.
fn non_scalar_field(yaml: &str) -> Option<(String, String)> {
    let doc: serde_yaml::Value = serde_yaml::from_str(yaml).ok()?;
    let mut pending = vec![doc];

    while let Some(spec) = pending.pop() {
        let Some(definitions) = spec.get("Definitions").and_then(serde_yaml::Value::as_mapping) else {
            continue;
        };
        for (id, definition) in definitions {
            if let Some(fields) = definition.get("Fields").and_then(serde_yaml::Value::as_mapping) {
                for (field, value) in fields {
                    if value.is_sequence() || value.is_mapping() {
                        return Some((yaml_key(id), yaml_key(field)));
                    }
                }
            }
            if let Some(subs) = definition.get("SubDefinitions").and_then(serde_yaml::Value::as_mapping) {
                pending.extend(subs.values().cloned());
            }
        }
    }
    None
}

fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other).unwrap_or_default().trim().to_string(),
    }
}

/// Read, decode and resolve file fields for one document.
pub fn load_specification(path: &Path) -> Result<Specification> {
    let yaml = fs::read_to_string(path).inspect_err(|e| {
        tracing::debug!(error = %e, "cannot load YAML file [{}]", path.display());
    })?;
    let mut spec = parse_specification(&yaml, path).inspect_err(|e| {
        tracing::debug!(error = %e, "cannot parse YAML file [{}]", path.display());
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    resolve_file_fields(&mut spec, base);
    Ok(spec)
}

/// Merge every document under every source root, in order, into one dictionary.
pub fn load_dictionary<P: AsRef<Path>>(sources: &[P], extension: &str, options: BuildOptions) -> LoadOutcome {
    let mut builder = Builder::with_options(options);
    let mut skipped = Vec::new();

    for root in sources {
        let root = root.as_ref();
        let files = match discover(root, extension) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(error = %e, "cannot process files in root directory [{}]", root.display());
                skipped.push(SkippedDocument { path: root.to_path_buf(), reason: e.to_string() });
                continue;
            }
        };

        for path in files {
            tracing::debug!("about to parse file [{}]", path.display());
            match load_specification(&path) {
                Ok(spec) => {
                    tracing::debug!("successfully parsed file [{}]", path.display());
                    builder.merge(spec);
                }
                Err(e) => {
                    tracing::warn!("skipping file [{}] due to error [{e}]", path.display());
                    skipped.push(SkippedDocument { path, reason: e.to_string() });
                }
            }
        }
    }

    let loaded = builder.documents();
    let (dictionary, report) = builder.finish();
    LoadOutcome { dictionary, report, skipped, loaded }
}
