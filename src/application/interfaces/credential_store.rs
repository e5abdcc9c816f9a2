use async_trait::async_trait;

use crate::domain::{Credential, DomainError};

/// Persistent storage for the single API key.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<Credential>, DomainError>;

    /// Replaces any previously stored key.
    async fn save(&self, credential: &Credential) -> Result<(), DomainError>;
}
