//! Per-invocation state shared by all commands
//!
//! Resolves the configuration file, the server URL and the API key once,
//! and builds the adapters the use cases talk to.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use vizsync_api::auth::resolve_api_key;
use vizsync_api::client::RedashClient;
use vizsync_api::provider::RedashApi;
use vizsync_core::config::Config;
use vizsync_core::domain::QueryId;
use vizsync_core::usecases::{DestinationSession, SessionPorts};

use crate::output::{get_formatter, ConsoleNotifier, OutputFormat, OutputFormatter};
use crate::prompt::DialoguerPrompt;
use crate::Cli;

pub struct AppContext {
    pub format: OutputFormat,
    pub quiet: bool,
    pub config: Config,
    pub config_path: PathBuf,
    server_override: Option<String>,
    api_key_override: Option<String>,
}

impl AppContext {
    /// Loads the configuration named by `--config`, or the default one.
    ///
    /// A missing file means defaults. An explicit file that does not parse is
    /// an error; the default file falls back to defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (config, config_path) = match &cli.config {
            Some(path) => {
                let path = PathBuf::from(path);
                let config = if path.exists() {
                    Config::load(&path)?
                } else {
                    Config::default()
                };
                (config, path)
            }
            None => {
                let path = Config::default_path();
                (Config::load_or_default(&path), path)
            }
        };

        Ok(Self {
            format: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
            quiet: cli.quiet,
            config,
            config_path,
            server_override: cli.server.clone(),
            api_key_override: cli.api_key.clone(),
        })
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.is_json())
    }

    /// Server base URL: `--server` wins over the configuration file
    pub fn server_url(&self) -> String {
        self.server_override
            .clone()
            .unwrap_or_else(|| self.config.server.base_url.clone())
    }

    pub fn has_api_key_override(&self) -> bool {
        self.api_key_override
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// API key from `--api-key`, the configuration file or the keyring
    pub fn api_key(&self) -> Result<Option<String>> {
        let configured = self
            .api_key_override
            .as_deref()
            .or(self.config.server.api_key.as_deref());
        resolve_api_key(configured, &self.server_url())
    }

    pub fn client(&self) -> Result<RedashClient> {
        let server = self.server_url();
        url::Url::parse(&server).with_context(|| format!("Invalid server URL: {server}"))?;

        let client = RedashClient::new(server.clone());
        match self.api_key()? {
            Some(key) => Ok(client.with_api_key(key)),
            None => {
                debug!(server = %server, "No API key available, sending anonymous requests");
                Ok(client)
            }
        }
    }

    pub fn api(&self) -> Result<RedashApi> {
        Ok(RedashApi::new(self.client()?))
    }

    pub fn notifier(&self) -> Arc<ConsoleNotifier> {
        Arc::new(ConsoleNotifier::new(self.format, self.quiet))
    }

    /// Opens a destination view for `query_id`
    pub fn session(&self, query_id: QueryId, assume_yes: bool) -> Result<DestinationSession> {
        let api = Arc::new(self.api()?);
        let ports = SessionPorts {
            api,
            notifier: self.notifier(),
            prompt: Arc::new(DialoguerPrompt::new(assume_yes)),
        };
        Ok(DestinationSession::open(
            query_id,
            None,
            ports,
            self.config.sync.poll_policy(),
        ))
    }
}
