use std::sync::Arc;

use tracing::{debug, info};

use crate::application::CredentialStore;
use crate::domain::{Credential, DomainError};

/// Resolves the API key for this process and persists newly entered keys.
///
/// An override (typically from `GEMINI_API_KEY`) wins over the stored key
/// and is never written back to the store.
pub struct AcquireCredentialUseCase {
    store: Arc<dyn CredentialStore>,
    override_key: Option<Credential>,
}

impl AcquireCredentialUseCase {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            override_key: None,
        }
    }

    pub fn with_override(mut self, credential: Option<Credential>) -> Self {
        self.override_key = credential;
        self
    }

    /// The active key, if one is available.
    pub async fn load(&self) -> Result<Option<Credential>, DomainError> {
        if let Some(credential) = &self.override_key {
            debug!("Using API key from the environment");
            return Ok(Some(credential.clone()));
        }
        self.store.load().await
    }

    /// Like [`Self::load`] but fails with [`DomainError::MissingCredential`].
    pub async fn require(&self) -> Result<Credential, DomainError> {
        self.load().await?.ok_or(DomainError::MissingCredential)
    }

    /// Validates and persists a key typed in by the user.
    pub async fn save(&self, token: &str) -> Result<Credential, DomainError> {
        let credential = Credential::new(token)?;
        self.store.save(&credential).await?;
        info!("API key saved");
        Ok(credential)
    }
}
