use anyhow::{Context, Result};
use dialoguer::Password;

use super::super::Container;

pub struct SetKeyController<'a> {
    container: &'a Container,
}

impl<'a> SetKeyController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn set_key(&self, key: Option<String>) -> Result<String> {
        let key = match key {
            Some(key) => key,
            None => prompt_for_key().await?,
        };

        self.container.credential_use_case().save(&key).await?;
        Ok(self.format_saved())
    }

    fn format_saved(&self) -> String {
        match self.container.credential_path() {
            Some(path) => format!("API key saved to {}", path.display()),
            None => "API key accepted (not persisted: --no-persist is set).".to_string(),
        }
    }
}

async fn prompt_for_key() -> Result<String> {
    tokio::task::spawn_blocking(|| {
        Password::new()
            .with_prompt("Enter your Gemini API key")
            .interact()
    })
    .await
    .context("key prompt task failed")?
    .context("failed to read API key")
}
