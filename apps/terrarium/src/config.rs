//! # Configuration
//!
//! Static configuration read once at process start.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `terrarium.toml` in the working directory if present)
//! 3. Environment variables:
//!    - `TERRARIUM_RECORDS_URL`: base URL of the records API
//!    - `TERRARIUM_RECORDS_TOKEN`: bearer token sent to the records API
//!
//! ## File Format
//!
//! ```toml
//! duplicate_policy = "overwrite"
//! preload_policy = "strict"
//!
//! [features]
//! todos = false
//! user-management = true
//! reptile-management = true
//!
//! [records]
//! base_url = "http://localhost:8081"
//! provider_timeout_ms = 5000
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use terrarium_core::{DuplicatePolicy, FeatureFlags, JoinPolicy};
use thiserror::Error;

/// File looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "terrarium.toml";

/// Maximum accepted configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

const DEFAULT_RECORDS_URL: &str = "http://localhost:8081";
const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5_000;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Records API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Per-provider call budget.
    pub provider_timeout_ms: u64,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RECORDS_URL.to_string(),
            token: None,
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub duplicate_policy: DuplicatePolicy,
    pub preload_policy: JoinPolicy,
    pub features: FeatureFlags,
    pub records: RecordsConfig,
}

impl AppConfig {
    /// Load configuration from `path`, or from the default file if it exists.
    ///
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    tracing::debug!("No {} found; using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        config
            .with_overrides(|key| std::env::var(key).ok())
            .validated()
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(path).map_err(io_error)?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "config file size {} bytes exceeds maximum {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(io_error)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `TERRARIUM_*` overrides looked up through `lookup`.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("TERRARIUM_RECORDS_URL").filter(|v| !v.is_empty()) {
            self.records.base_url = url;
        }
        if let Some(token) = lookup("TERRARIUM_RECORDS_TOKEN").filter(|v| !v.is_empty()) {
            self.records.token = Some(token);
        }
        self
    }

    /// Reject values the shell cannot run with.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.records.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "records.base_url must not be empty".to_string(),
            ));
        }
        if self.records.provider_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "records.provider_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    /// Per-provider call budget.
    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.records.provider_timeout_ms)
    }
}

// =============================================================================
// TESTS
// =============================================================================
