use std::{fmt, io::ErrorKind, path::PathBuf};

use crate::types::Credential;

#[derive(Debug)]
pub enum CredentialError {
    NotFound,
    /// The file exists but is not text, e.g. a cache left by another tool.
    Corrupt(std::io::Error),
    IoError(std::io::Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::NotFound => write!(f, "no cached credential"),
            CredentialError::Corrupt(e) => write!(f, "credential file is unreadable: {}", e),
            CredentialError::IoError(e) => write!(f, "credential file error: {}", e),
            CredentialError::SerdeError(e) => write!(f, "credential file is corrupt: {}", e),
        }
    }
}

impl std::error::Error for CredentialError {}

impl From<std::io::Error> for CredentialError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => CredentialError::NotFound,
            ErrorKind::InvalidData => CredentialError::Corrupt(err),
            _ => CredentialError::IoError(err),
        }
    }
}

impl From<serde_json::Error> for CredentialError {
    fn from(err: serde_json::Error) -> Self {
        CredentialError::SerdeError(err)
    }
}

/// Flat key-value file holding the access token, user id and expiry hint
/// between runs. The token is never refreshed or checked for expiry.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<Credential, CredentialError> {
        let content = async_fs::read_to_string(&self.path).await?;
        let credential: Credential = serde_json::from_str(&content)?;
        if credential.access_token.is_empty() || credential.user_id.is_empty() {
            return Err(CredentialError::NotFound);
        }
        Ok(credential)
    }

    pub async fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(credential)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}
