//! File-backed fields: small files referenced by a document, base64-encoded
//! into ordinary field values before the document reaches the builder.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::model::{Definition, FileDefinition, Specification, Value};
use crate::Result;

/// `prefix` followed by the base64 encoding of the file at `base/path`.
pub fn encode_file_field(base: &Path, file: &FileDefinition) -> Result<String> {
    let bytes = fs::read(base.join(&file.path))?;
    Ok(format!("{}{}", file.prefix, STANDARD.encode(bytes)))
}

/// Resolve the file fields of every definition in `spec`, nested ones
/// included, relative to `base`. A file that cannot be read leaves its
/// field unset.
pub fn resolve_file_fields(spec: &mut Specification, base: &Path) {
    let mut stack: Vec<&mut Specification> = vec![spec];
    while let Some(spec) = stack.pop() {
        for definition in spec.definitions.values_mut() {
            resolve_definition(definition, base);
            stack.extend(definition.sub_definitions.values_mut());
        }
    }
}

fn resolve_definition(definition: &mut Definition, base: &Path) {
    for (name, file) in &definition.file_fields {
        match encode_file_field(base, file) {
            Ok(encoded) => {
                definition.fields.insert(name.clone(), Value::String(encoded));
            }
            Err(e) => {
                tracing::debug!(error = %e, field = %name, "cannot encode file [{}]", file.path.display());
            }
        }
    }
}
