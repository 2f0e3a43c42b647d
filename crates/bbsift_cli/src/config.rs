//! `.bbsift.json` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".bbsift.json";

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Command-line configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SifterConfig {
    /// Path to a tag dictionary; the built-in one when unset.
    pub dictionary: Option<PathBuf>,

    /// Escape `<`, `>` and `"` before parsing.
    pub escape_html: bool,

    /// Directory of the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Default for SifterConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            escape_html: true,
            base_dir: None,
        }
    }
}

impl SifterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the configuration file in `dir`, if present.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let path = dir.as_ref().join(CONFIG_FILE);
        path.is_file().then_some(path)
    }

    /// Returns the dictionary path resolved against the configuration file.
    pub fn dictionary_path(&self) -> Option<PathBuf> {
        let path = self.dictionary.as_ref()?;
        match &self.base_dir {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path.clone()),
        }
    }
}
