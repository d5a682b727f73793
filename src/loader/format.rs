//! Schema documents: decode strictly and fold many into one [`Format`].

use std::fs;
use std::path::Path;

use crate::model::Format;
use crate::{Error, Result};

/// Decode one schema document. Unknown keys are rejected.
pub fn load_format(path: &Path) -> Result<Format> {
    let yaml = fs::read_to_string(path).inspect_err(|e| {
        tracing::error!(error = %e, "could not open definition format configuration [{}]", path.display());
    })?;
    let format: Format = serde_yaml::from_str(&yaml)
        .map_err(|source| Error::Yaml { path: path.to_path_buf(), source })
        .inspect_err(|e| {
            tracing::error!(error = %e, "could not unmarshal definition format configuration [{}]", path.display());
        })?;
    tracing::debug!("successfully unmarshalled definition format configuration [{}]", path.display());
    Ok(format)
}

/// Load and merge several schema documents. Declaring a class twice across
/// documents is an error.
pub fn load_formats<P: AsRef<Path>>(paths: &[P]) -> Result<Format> {
    let mut merged = Format::new();
    for path in paths {
        merged.merge(load_format(path.as_ref())?)?;
    }
    Ok(merged)
}
