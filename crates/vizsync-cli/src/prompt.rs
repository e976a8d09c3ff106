//! Terminal confirmation prompt

use anyhow::Context;
use dialoguer::Confirm;

use vizsync_core::ports::IConfirmationPrompt;

/// Asks on the terminal unless `--yes` was given
pub struct DialoguerPrompt {
    assume_yes: bool,
}

impl DialoguerPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait::async_trait]
impl IConfirmationPrompt for DialoguerPrompt {
    async fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        let question = question.to_string();
        // dialoguer blocks on stdin
        tokio::task::spawn_blocking(move || {
            Confirm::new()
                .with_prompt(question)
                .default(false)
                .interact()
                .context("Confirmation needs an interactive terminal; pass --yes to skip it")
        })
        .await
        .context("Confirmation prompt task failed")?
    }
}
