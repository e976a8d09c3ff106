//! API key storage
//!
//! Keys are kept in the OS credential store (GNOME Keyring, KDE Wallet,
//! macOS Keychain) under the service name `vizsync`, one entry per server
//! base URL. A key set in the configuration file takes precedence.

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Keyring service name for storing API keys
const KEYRING_SERVICE: &str = "vizsync";

/// Stores and retrieves API keys from the system keyring
pub struct KeyringKeyStorage;

impl KeyringKeyStorage {
    /// Stores `api_key` for `server`
    pub fn store(server: &str, api_key: &str) -> Result<()> {
        let entry = entry(server)?;
        entry
            .set_password(api_key)
            .context("Failed to store API key in keyring")?;
        debug!(server = %account(server), "Stored API key in keyring");
        Ok(())
    }

    /// Loads the key for `server`, `None` if none was stored
    pub fn load(server: &str) -> Result<Option<String>> {
        let entry = entry(server)?;
        match entry.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => {
                debug!(server = %account(server), "No API key found in keyring");
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to read from keyring")),
        }
    }

    /// Removes the key for `server`; a missing key is not an error
    pub fn clear(server: &str) -> Result<()> {
        let entry = entry(server)?;
        match entry.delete_credential() {
            Ok(()) => {
                info!(server = %account(server), "Cleared API key from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!(server = %account(server), "No API key to clear");
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to delete from keyring")),
        }
    }
}

/// Picks the configured key if present, otherwise the keyring entry
pub fn resolve_api_key(configured: Option<&str>, server: &str) -> Result<Option<String>> {
    if let Some(key) = configured.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(Some(key.to_string()));
    }
    KeyringKeyStorage::load(server)
}

fn entry(server: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, &account(server)).context("Failed to create keyring entry")
}

/// Keyring account name for a server; trailing slashes do not matter
fn account(server: &str) -> String {
    server.trim().trim_end_matches('/').to_string()
}
