use async_trait::async_trait;

use crate::domain::DomainError;

/// A hosted language model that turns a single prompt into a reply.
///
/// Implementors encapsulate transport, authentication, and vendor-specific
/// payloads. Any transport, auth, or quota failure is reported as
/// [`DomainError::ModelError`] with a human-readable message.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generate a reply for `prompt`. No prior conversation is supplied.
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;
}
