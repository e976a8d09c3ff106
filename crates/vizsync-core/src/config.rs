//! Configuration module for vizsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::usecases::PollPolicy;

/// Top-level configuration for vizsync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sync: SyncConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the server, e.g. `https://redash.example.com`.
    pub base_url: String,
    /// API key. When unset the key stored in the OS keyring is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Sync job polling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Milliseconds between two job status checks.
    pub poll_interval_ms: u64,
    /// Status checks before a sync is reported as timed out.
    pub max_attempts: u32,
    /// Overall seconds allowed for one sync.
    pub timeout_secs: u64,
}

/// Data catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog backend queried for dataset metadata.
    pub catalog_type: String,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/vizsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("vizsync")
            .join("config.yaml")
    }

    /// Write the configuration as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            api_key: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        let policy = PollPolicy::default();
        Self {
            poll_interval_ms: policy.interval.as_millis() as u64,
            max_attempts: policy.max_attempts,
            timeout_secs: policy.timeout.as_secs(),
        }
    }
}

impl SyncConfig {
    /// Poll bounds for [`SyncJobPoller`](crate::usecases::SyncJobPoller).
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_attempts,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_type: "datahub".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.max_attempts"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- server ---
        let base_url = self.server.base_url.trim();
        if base_url.is_empty() {
            errors.push(ValidationError {
                field: "server.base_url".into(),
                message: "must not be empty".into(),
            });
        } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            errors.push(ValidationError {
                field: "server.base_url".into(),
                message: format!("must start with http:// or https://, got '{base_url}'"),
            });
        }
        if matches!(&self.server.api_key, Some(key) if key.trim().is_empty()) {
            errors.push(ValidationError {
                field: "server.api_key".into(),
                message: "must not be blank; remove it to use the keyring".into(),
            });
        }

        // --- sync ---
        if self.sync.poll_interval_ms == 0 {
            errors.push(ValidationError {
                field: "sync.poll_interval_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.max_attempts == 0 {
            errors.push(ValidationError {
                field: "sync.max_attempts".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "sync.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        } else if self.sync.timeout_secs * 1000 < self.sync.poll_interval_ms {
            errors.push(ValidationError {
                field: "sync.timeout_secs".into(),
                message: format!(
                    "timeout ({}s) is shorter than one poll interval ({}ms)",
                    self.sync.timeout_secs, self.sync.poll_interval_ms
                ),
            });
        }

        // --- catalog ---
        if self.catalog.catalog_type.trim().is_empty() {
            errors.push(ValidationError {
                field: "catalog.catalog_type".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use vizsync_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .server_base_url("https://redash.example.com")
///     .sync_poll_interval_ms(500)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- server ---

    pub fn server_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.server.base_url = url.into();
        self
    }

    pub fn server_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.server.api_key = Some(key.into());
        self
    }

    // --- sync ---

    pub fn sync_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.sync.poll_interval_ms = ms;
        self
    }

    pub fn sync_max_attempts(mut self, n: u32) -> Self {
        self.config.sync.max_attempts = n;
        self
    }

    pub fn sync_timeout_secs(mut self, secs: u64) -> Self {
        self.config.sync.timeout_secs = secs;
        self
    }

    // --- catalog ---

    pub fn catalog_type(mut self, catalog_type: impl Into<String>) -> Self {
        self.config.catalog.catalog_type = catalog_type.into();
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
