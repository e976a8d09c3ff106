//! Auth commands - Manage the API key used for a server
//!
//! Provides the `vizsync auth` CLI subcommands which:
//! 1. `set-key` - Stores an API key in the system keyring for the server.
//! 2. `clear`   - Removes the stored key.
//! 3. `status`  - Shows which key source is in effect for the server.

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;

use vizsync_api::auth::KeyringKeyStorage;

use crate::context::AppContext;

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Store an API key in the system keyring
    SetKey {
        /// The key; read from stdin when omitted
        key: Option<String>,
    },
    /// Remove the stored API key
    Clear,
    /// Show where the API key comes from
    Status,
}

/// Where the key in effect was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeySource {
    Flag,
    Config,
    Keyring,
    None,
}

impl KeySource {
    fn as_str(&self) -> &'static str {
        match self {
            KeySource::Flag => "command line",
            KeySource::Config => "configuration file",
            KeySource::Keyring => "system keyring",
            KeySource::None => "none",
        }
    }
}

impl AuthCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            AuthCommand::SetKey { key } => self.execute_set_key(ctx, key.as_deref()),
            AuthCommand::Clear => self.execute_clear(ctx),
            AuthCommand::Status => self.execute_status(ctx),
        }
    }

    fn execute_set_key(&self, ctx: &AppContext, key: Option<&str>) -> Result<()> {
        let formatter = ctx.formatter();
        let server = ctx.server_url();

        let key = match key {
            Some(key) => key.to_string(),
            None => read_key(std::io::stdin().lock())?,
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("API key must not be empty");
        }

        KeyringKeyStorage::store(&server, key)?;
        info!(server = %server, "API key stored");

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({ "success": true, "server": server }));
        } else {
            formatter.success(&format!("API key stored for {server}"));
        }
        Ok(())
    }

    fn execute_clear(&self, ctx: &AppContext) -> Result<()> {
        let formatter = ctx.formatter();
        let server = ctx.server_url();

        KeyringKeyStorage::clear(&server)?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({ "success": true, "server": server }));
        } else {
            formatter.success(&format!("API key removed for {server}"));
            if ctx.config.server.api_key.is_some() {
                formatter.warn("server.api_key is still set in the configuration file");
            }
        }
        Ok(())
    }

    fn execute_status(&self, ctx: &AppContext) -> Result<()> {
        let formatter = ctx.formatter();
        let server = ctx.server_url();
        let source = key_source(ctx)?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "server": server,
                "authenticated": source != KeySource::None,
                "key_source": source.as_str(),
            }));
            return Ok(());
        }

        formatter.info(&format!("Server:     {server}"));
        if source == KeySource::None {
            formatter.warn("No API key configured; run 'vizsync auth set-key'");
        } else {
            formatter.success(&format!("API key from the {}", source.as_str()));
        }
        Ok(())
    }
}

fn key_source(ctx: &AppContext) -> Result<KeySource> {
    if ctx.has_api_key_override() {
        return Ok(KeySource::Flag);
    }
    if ctx
        .config
        .server
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty())
    {
        return Ok(KeySource::Config);
    }
    match KeyringKeyStorage::load(&ctx.server_url())? {
        Some(_) => Ok(KeySource::Keyring),
        None => Ok(KeySource::None),
    }
}

fn read_key(mut input: impl BufRead) -> Result<String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read API key from stdin")?;
    Ok(line.trim().to_string())
}
