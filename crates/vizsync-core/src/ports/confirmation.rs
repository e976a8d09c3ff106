//! Confirmation prompt port (driving side of destructive actions)
//!
//! Destructive operations ask the user first. The CLI answers with an
//! interactive prompt (or `--yes`); tests answer with a fixed value.

/// Port trait for yes/no confirmation
#[async_trait::async_trait]
pub trait IConfirmationPrompt: Send + Sync {
    /// Asks `question`; `Ok(true)` means the user confirmed
    async fn confirm(&self, question: &str) -> anyhow::Result<bool>;
}
