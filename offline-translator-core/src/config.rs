//! Configuration for the translation bridge.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of live translators kept resident.
pub const DEFAULT_CACHE_CAPACITY: usize = 3;

/// Network conditions a model download is allowed to run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConditions {
    /// Allow downloads over metered cellular connections.
    pub allow_cellular: bool,
    /// Allow downloads to continue while the host app is backgrounded.
    pub allow_background: bool,
}

impl Default for DownloadConditions {
    fn default() -> Self {
        Self {
            allow_cellular: true,
            allow_background: true,
        }
    }
}

/// Bridge configuration, usually loaded from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Maximum number of translators kept in the cache (at least 1).
    pub cache_capacity: usize,
    /// Conditions forwarded to every model download.
    pub download: DownloadConditions,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            download: DownloadConditions::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file does not exist, or a parse or
    /// validation error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(Error::Io)?;
        let config: Self = toml::from_str(&content).map_err(|error| Error::Config {
            error,
            context: path.display().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Sets the download conditions.
    pub fn with_download_conditions(mut self, conditions: DownloadConditions) -> Self {
        self.download = conditions;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(Error::InvalidConfig(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
