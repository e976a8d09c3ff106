//! Config command - View and manage vizsync configuration
//!
//! Provides the `vizsync config` CLI command which:
//! 1. Shows the current configuration (YAML or JSON)
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors
//! 4. Writes a starter configuration file

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;

use vizsync_core::config::{Config, ConfigBuilder};

use crate::context::AppContext;

/// Shown instead of a configured API key
const MASKED_KEY: &str = "********";

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "sync.poll_interval_ms")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx),
            ConfigCommand::Set { key, value } => self.execute_set(ctx, key, value),
            ConfigCommand::Validate => self.execute_validate(ctx),
            ConfigCommand::Init { force } => self.execute_init(ctx, *force),
        }
    }

    fn execute_show(&self, ctx: &AppContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = masked(&ctx.config);

        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if ctx.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    fn execute_set(&self, ctx: &AppContext, key: &str, value: &str) -> Result<()> {
        let formatter = ctx.formatter();
        let mut config = ctx.config.clone();

        info!(key = %key, "Setting configuration value");

        if let Err(e) = apply_config_value(&mut config, key, value) {
            if !ctx.is_json() {
                formatter.info("Supported keys:");
                for (name, help) in SUPPORTED_KEYS {
                    formatter.info(&format!("  {name:<24} - {help}"));
                }
            }
            return Err(e);
        }

        // Validate the new config before saving
        let errors = config.validate();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            bail!("Invalid value for '{}': {}", key, messages.join("; "));
        }

        config.save(&ctx.config_path)?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "config_path": ctx.config_path.display().to_string(),
            }));
        } else {
            let shown = if key == "server.api_key" { MASKED_KEY } else { value };
            formatter.success(&format!("Set {} = {}", key, shown));
            formatter.info(&format!("Saved to {}", ctx.config_path.display()));
        }
        Ok(())
    }

    fn execute_validate(&self, ctx: &AppContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config_path = &ctx.config_path;

        // Try to load the config file explicitly (not load_or_default)
        let config = match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                if !config_path.exists() {
                    if ctx.is_json() {
                        formatter.print_json(&serde_json::json!({
                            "valid": false,
                            "config_path": config_path.display().to_string(),
                            "errors": ["Configuration file not found. Using defaults."],
                        }));
                    } else {
                        formatter.info(&format!(
                            "Configuration file not found at {}",
                            config_path.display()
                        ));
                        formatter.info(
                            "Using default configuration. Run 'vizsync config init' to create one.",
                        );
                    }
                    return Ok(());
                }
                return Err(e);
            }
        };

        info!(config_path = %config_path.display(), "Validating configuration");

        let errors = config.validate();

        if ctx.is_json() {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!("Configuration is invalid")
        }
    }

    fn execute_init(&self, ctx: &AppContext, force: bool) -> Result<()> {
        let formatter = ctx.formatter();
        let config_path = &ctx.config_path;

        if config_path.exists() && !force {
            bail!(
                "{} already exists; pass --force to overwrite it",
                config_path.display()
            );
        }

        let config = starter_config(&ctx.server_url())
            .map_err(|errors| {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                anyhow::anyhow!(messages.join("; "))
            })
            .context("Refusing to write an invalid configuration")?;
        config.save(config_path)?;

        info!(config_path = %config_path.display(), "Configuration file written");

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "config_path": config_path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Wrote {}", config_path.display()));
            formatter.info("Store an API key with 'vizsync auth set-key'");
        }
        Ok(())
    }
}

/// Keys accepted by `config set`
const SUPPORTED_KEYS: &[(&str, &str)] = &[
    ("server.base_url", "Server base URL"),
    ("server.api_key", "API key, 'none' to unset"),
    ("sync.poll_interval_ms", "Milliseconds between status checks"),
    ("sync.max_attempts", "Status checks before giving up"),
    ("sync.timeout_secs", "Seconds allowed for one sync"),
    ("catalog.catalog_type", "Data catalog backend"),
    ("logging.level", "trace|debug|info|warn|error"),
];

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        // --- server ---
        "server.base_url" => {
            config.server.base_url = value.trim_end_matches('/').to_string();
        }
        "server.api_key" => {
            config.server.api_key = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.to_string())
            };
        }

        // --- sync ---
        "sync.poll_interval_ms" => {
            config.sync.poll_interval_ms = value
                .parse::<u64>()
                .context("Expected a positive integer for sync.poll_interval_ms")?;
        }
        "sync.max_attempts" => {
            config.sync.max_attempts = value
                .parse::<u32>()
                .context("Expected a positive integer for sync.max_attempts")?;
        }
        "sync.timeout_secs" => {
            config.sync.timeout_secs = value
                .parse::<u64>()
                .context("Expected a positive integer for sync.timeout_secs")?;
        }

        // --- catalog ---
        "catalog.catalog_type" => {
            config.catalog.catalog_type = value.to_string();
        }

        // --- logging ---
        "logging.level" => {
            config.logging.level = value.to_string();
        }

        _ => {
            bail!("Unknown configuration key: '{}'", key);
        }
    }

    Ok(())
}

fn starter_config(
    server: &str,
) -> Result<Config, Vec<vizsync_core::config::ValidationError>> {
    ConfigBuilder::new()
        .server_base_url(server.trim_end_matches('/'))
        .build_validated()
}

fn masked(config: &Config) -> Config {
    let mut config = config.clone();
    if config.server.api_key.is_some() {
        config.server.api_key = Some(MASKED_KEY.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_server_base_url() {
        let mut config = Config::default();
        apply_config_value(&mut config, "server.base_url", "https://redash.example.com/")
            .unwrap();
        assert_eq!(config.server.base_url, "https://redash.example.com");
    }

    #[test]
    fn test_apply_and_unset_api_key() {
        let mut config = Config::default();
        apply_config_value(&mut config, "server.api_key", "k3y").unwrap();
        assert_eq!(config.server.api_key.as_deref(), Some("k3y"));
        apply_config_value(&mut config, "server.api_key", "none").unwrap();
        assert!(config.server.api_key.is_none());
    }

    #[test]
    fn test_apply_sync_values() {
        let mut config = Config::default();
        apply_config_value(&mut config, "sync.poll_interval_ms", "250").unwrap();
        apply_config_value(&mut config, "sync.max_attempts", "40").unwrap();
        apply_config_value(&mut config, "sync.timeout_secs", "60").unwrap();
        let policy = config.sync.poll_policy();
        assert_eq!(policy.interval.as_millis(), 250);
        assert_eq!(policy.max_attempts, 40);
        assert_eq!(policy.timeout.as_secs(), 60);
    }

    #[test]
    fn test_apply_invalid_number() {
        let mut config = Config::default();
        assert!(apply_config_value(&mut config, "sync.max_attempts", "many").is_err());
    }

    #[test]
    fn test_apply_unknown_key() {
        let mut config = Config::default();
        let err = apply_config_value(&mut config, "sync.root", "/tmp").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_every_supported_key_is_accepted() {
        let samples = [
            ("server.base_url", "https://redash.example.com"),
            ("server.api_key", "k3y"),
            ("sync.poll_interval_ms", "500"),
            ("sync.max_attempts", "10"),
            ("sync.timeout_secs", "30"),
            ("catalog.catalog_type", "datahub"),
            ("logging.level", "debug"),
        ];
        assert_eq!(samples.len(), SUPPORTED_KEYS.len());
        for (key, value) in samples {
            let mut config = Config::default();
            apply_config_value(&mut config, key, value).unwrap();
            assert!(config.validate().is_empty(), "{key}");
        }
    }

    #[test]
    fn test_show_masks_api_key() {
        let mut config = Config::default();
        config.server.api_key = Some("s3cr3t".to_string());
        assert_eq!(masked(&config).server.api_key.as_deref(), Some(MASKED_KEY));
        assert!(masked(&Config::default()).server.api_key.is_none());
    }

    #[test]
    fn test_starter_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = starter_config("https://redash.example.com/").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.base_url, "https://redash.example.com");
        assert_eq!(loaded.sync, Config::default().sync);
    }

    #[test]
    fn test_starter_config_rejects_bad_server() {
        assert!(starter_config("ftp://redash.example.com").is_err());
    }
}
