use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::CredentialStore;
use crate::domain::{Credential, DomainError};

pub const CREDENTIAL_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    api_key: Option<String>,
}

/// Stores the API key as `{"api_key": "..."}` in a JSON file.
///
/// A missing file, a missing field, or a blank value all read back as "no key".
pub struct JsonCredentialStore {
    path: PathBuf,
}

impl JsonCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located at `<data_dir>/config.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(CREDENTIAL_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for JsonCredentialStore {
    async fn load(&self) -> Result<Option<Credential>, DomainError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No credential file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let file: CredentialFile = serde_json::from_str(&raw).map_err(|e| {
            DomainError::storage(format!(
                "malformed credential file {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(file.api_key.and_then(|key| Credential::new(key).ok()))
    }

    async fn save(&self, credential: &Credential) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_string(&CredentialFile {
            api_key: Some(credential.expose().to_string()),
        })
        .map_err(|e| DomainError::storage(format!("failed to encode credential: {e}")))?;

        let mut file = owner_only(OpenOptions::new().write(true).create(true).truncate(true))
            .open(&self.path)
            .await?;
        // A file that already existed keeps its old mode until it is reset here.
        restrict_permissions(&self.path).await?;
        file.write_all(body.as_bytes()).await?;
        file.flush().await?;

        debug!("Credential written to {}", self.path.display());
        Ok(())
    }
}

/// New files are created readable by the owner only.
#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options.mode(0o600)
}

#[cfg(not(unix))]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), DomainError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), DomainError> {
    Ok(())
}
