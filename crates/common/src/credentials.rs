use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

/// On-disk layout of the credential file:
///
/// ```toml
/// [users]
/// admin = "$2b$12$..."
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    users: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("username cannot be empty")]
    EmptyUsername,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Username → bcrypt hash mapping backed by a TOML file.
///
/// The file is re-read on every call, so edits made while the service is
/// running take effect on the next sign-in.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full mapping. A missing file is an empty mapping.
    pub async fn load(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(toml::from_str::<CredentialFile>(&raw)?.users),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no credential file, no users");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// True iff `username` exists and its stored hash matches `password`.
    ///
    /// There is no lockout or rate limiting on repeated failures.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let users = self.load().await?;
        let Some(hash) = users.get(username).cloned() else {
            return Ok(false);
        };

        // bcrypt is CPU bound
        let password = password.to_owned();
        let result = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;

        match result {
            Ok(valid) => Ok(valid),
            Err(e) => {
                tracing::warn!(user = username, "stored password hash is unusable: {}", e);
                Ok(false)
            }
        }
    }

    /// Hash `password` and store it under `username`, replacing any previous entry.
    pub async fn set(
        &self,
        username: &str,
        password: &str,
        cost: u32,
    ) -> Result<(), CredentialError> {
        if username.trim().is_empty() {
            return Err(CredentialError::EmptyUsername);
        }

        let mut users = self.load().await?;
        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        users.insert(username.to_string(), hash);

        let raw = toml::to_string_pretty(&CredentialFile { users })?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, raw).await?;

        tracing::info!(user = username, path = %self.path.display(), "credential stored");
        Ok(())
    }
}
