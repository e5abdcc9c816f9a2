use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{AcquireCredentialUseCase, ChatSession, CredentialStore, ModelClient};
use crate::domain::Credential;
use crate::{GeminiClient, InMemoryCredentialStore, JsonCredentialStore};

pub struct ContainerConfig {
    pub data_dir: String,
    pub model: String,
    pub base_url: String,
    /// Keep entered keys in memory only; nothing is read from or written to disk.
    pub no_persist: bool,
    /// Key supplied by the environment (`GEMINI_API_KEY`); takes precedence
    /// over the stored key and is never saved.
    pub env_api_key: Option<String>,
}

pub struct Container {
    credential_store: Arc<dyn CredentialStore>,
    credential_path: Option<PathBuf>,
    env_credential: Option<Credential>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let (credential_store, credential_path): (Arc<dyn CredentialStore>, Option<PathBuf>) =
            if config.no_persist {
                debug!("Using in-memory credential storage");
                (Arc::new(InMemoryCredentialStore::new()), None)
            } else {
                let store = JsonCredentialStore::in_dir(&config.data_dir);
                debug!("Using credential file at {}", store.path().display());
                let path = store.path().to_path_buf();
                (Arc::new(store), Some(path))
            };

        // A blank GEMINI_API_KEY is treated as unset.
        let env_credential = config
            .env_api_key
            .as_deref()
            .and_then(|key| Credential::new(key).ok());

        Ok(Self {
            credential_store,
            credential_path,
            env_credential,
            config,
        })
    }

    pub fn credential_use_case(&self) -> AcquireCredentialUseCase {
        AcquireCredentialUseCase::new(self.credential_store.clone())
            .with_override(self.env_credential.clone())
    }

    pub fn model_client(&self, credential: Credential) -> Arc<dyn ModelClient> {
        Arc::new(GeminiClient::new(
            credential,
            self.config.model.clone(),
            self.config.base_url.clone(),
        ))
    }

    pub fn chat_session(&self, credential: Credential) -> ChatSession {
        ChatSession::new(self.model_client(credential))
    }

    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Location of the credential file, or `None` when keys are not persisted.
    pub fn credential_path(&self) -> Option<&Path> {
        self.credential_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &Path, no_persist: bool, env_api_key: Option<&str>) -> ContainerConfig {
        ContainerConfig {
            data_dir: dir.to_string_lossy().to_string(),
            model: "gemini-pro".to_string(),
            base_url: "http://localhost:1".to_string(),
            no_persist,
            env_api_key: env_api_key.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_persistent_container_uses_config_json() {
        let dir = tempfile::tempdir().unwrap();
        let container = Container::new(config(dir.path(), false, None)).unwrap();

        assert_eq!(
            container.credential_path(),
            Some(dir.path().join("config.json").as_path())
        );

        container.credential_use_case().save("abc").await.unwrap();
        assert!(dir.path().join("config.json").exists());
    }

    #[tokio::test]
    async fn test_no_persist_container_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let container = Container::new(config(dir.path(), true, None)).unwrap();

        assert!(container.credential_path().is_none());
        container.credential_use_case().save("abc").await.unwrap();
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn test_no_persist_container_leaves_data_dir_alone() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("never-created");
        Container::new(config(&data_dir, true, None)).unwrap();

        assert!(!data_dir.exists());
    }

    #[tokio::test]
    async fn test_blank_env_key_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let container = Container::new(config(dir.path(), true, Some("  "))).unwrap();

        let err = container.credential_use_case().require().await.unwrap_err();
        assert!(err.is_missing_credential());
    }

    #[tokio::test]
    async fn test_env_key_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let container = Container::new(config(dir.path(), true, Some("env-key"))).unwrap();

        let credential = container.credential_use_case().require().await.unwrap();
        assert_eq!(credential.expose(), "env-key");
    }
}
