use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("No API key available")]
    MissingCredential,

    #[error("Blank input")]
    BlankInput,

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DomainError {
    pub fn model(msg: impl Into<String>) -> Self {
        Self::ModelError(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }

    /// Blank input is a local rejection, not a failure worth reporting.
    pub fn is_blank_input(&self) -> bool {
        matches!(self, Self::BlankInput)
    }

    pub fn is_model_error(&self) -> bool {
        matches!(self, Self::ModelError(_))
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_display_carries_message() {
        let err = DomainError::model("quota exceeded");
        assert_eq!(err.to_string(), "Model error: quota exceeded");
        assert!(err.is_model_error());
        assert!(!err.is_blank_input());
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DomainError = io.into();
        assert!(matches!(err, DomainError::IoError(_)));
    }
}
