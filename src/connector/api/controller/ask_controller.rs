use std::time::Duration;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::DomainError;

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, prompt: String) -> Result<String> {
        let credential = match self.container.credential_use_case().require().await {
            Ok(credential) => credential,
            Err(DomainError::MissingCredential) => {
                bail!("No API key available. Run `geminidesk set-key` or set GEMINI_API_KEY.")
            }
            Err(e) => return Err(e.into()),
        };

        let mut session = self.container.chat_session(credential);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Waiting for {}...", self.container.model()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = session.send(&prompt).await;
        spinner.finish_and_clear();

        match result {
            Ok(reply) => Ok(reply),
            Err(DomainError::BlankInput) => bail!("Prompt is empty; nothing to send."),
            Err(e) => Err(e.into()),
        }
    }
}
