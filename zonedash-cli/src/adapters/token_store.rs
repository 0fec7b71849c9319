//! File-based token store
//!
//! Keeps the bearer token in a single file under the user data directory so
//! consecutive invocations share one session.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use zonedash_api::{ApiError, TokenStore};

const TOKEN_FILE_NAME: &str = "token";

/// Token store backed by one file.
///
/// On Unix the file is created with owner-only permissions (`0600`).
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Platform default: `<data_dir>/zonedash/token`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("zonedash").join(TOKEN_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_sync(path: &Path, token: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;

            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(token.as_bytes())
        }

        #[cfg(not(unix))]
        {
            std::fs::write(path, token)
        }
    }
}

fn storage_error(action: &str, e: &std::io::Error) -> ApiError {
    ApiError::SessionStorage {
        detail: format!("Failed to {action} token file: {e}"),
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> zonedash_api::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No token file at {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(storage_error("read", &e)),
        }
    }

    async fn save(&self, token: &str) -> zonedash_api::Result<()> {
        let path = self.path.clone();
        let token = token.to_string();
        tokio::task::spawn_blocking(move || Self::write_sync(&path, &token))
            .await
            .map_err(|e| ApiError::SessionStorage {
                detail: format!("Task join error: {e}"),
            })?
            .map_err(|e| storage_error("write", &e))?;
        tracing::debug!("Saved token to {}", self.path.display());
        Ok(())
    }

    async fn remove(&self) -> zonedash_api::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &e)),
        }
    }
}
