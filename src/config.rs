//! Run configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Command-line flags are applied on top with [`Config::override_with`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::{BuildOptions, DEFAULT_MAX_DEPTH};
use crate::{Error, Result};

/// Settings for one load → build → validate run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Source roots, walked in order.
    pub sources: Vec<PathBuf>,
    /// Definition file extension, without the dot.
    pub extension: String,
    /// Schema documents merged into one format before validation.
    pub formats: Vec<PathBuf>,
    /// Deepest `SubDefinitions` level merged.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: vec![PathBuf::from("definition")],
            extension: "yaml".to_string(),
            formats: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Command-line values that replace configuration values when present.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub sources: Vec<PathBuf>,
    pub extension: Option<String>,
    pub formats: Vec<PathBuf>,
    pub max_depth: Option<usize>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml(&yaml, path)
    }

    pub fn from_yaml(yaml: &str, origin: &Path) -> Result<Self> {
        // An empty document decodes to null rather than an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|source| Error::Yaml { path: origin.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(Error::Config("extension must not be empty".into()));
        }
        if self.sources.is_empty() {
            return Err(Error::Config("at least one source directory is required".into()));
        }
        Ok(())
    }

    pub fn override_with(mut self, overrides: Overrides) -> Result<Self> {
        if !overrides.sources.is_empty() {
            self.sources = overrides.sources;
        }
        if let Some(extension) = overrides.extension {
            self.extension = extension;
        }
        if !overrides.formats.is_empty() {
            self.formats = overrides.formats;
        }
        if let Some(max_depth) = overrides.max_depth {
            self.max_depth = max_depth;
        }
        self.validate()?;
        Ok(self)
    }

    /// The extension without any leading dot.
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions { max_depth: self.max_depth }
    }
}
