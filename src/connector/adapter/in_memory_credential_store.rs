use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::CredentialStore;
use crate::domain::{Credential, DomainError};

/// Process-local credential storage; nothing survives a restart.
pub struct InMemoryCredentialStore {
    credential: Mutex<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            credential: Mutex::new(None),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<Credential>, DomainError> {
        Ok(self.credential.lock().await.clone())
    }

    async fn save(&self, credential: &Credential) -> Result<(), DomainError> {
        *self.credential.lock().await = Some(credential.clone());
        Ok(())
    }
}
