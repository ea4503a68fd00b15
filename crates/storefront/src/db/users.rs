//! Demo account directory backed by a JSON file.
//!
//! Lookups are linear scans over the whole file; the directory is expected to
//! hold a handful of accounts. Writes go to a sibling temp file which is then
//! renamed over the original so a crash never leaves a half-written list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bazaar_core::Email;
use bazaar_core::registration::RegisteredUser;
use tokio::sync::Mutex;
use tracing::instrument;

use super::RepositoryError;

/// File-backed list of registered demo accounts.
///
/// Cheap to clone; clones share one lock so concurrent registrations are
/// serialized.
#[derive(Clone)]
pub struct UserDirectory {
    inner: Arc<UserDirectoryInner>,
}

struct UserDirectoryInner {
    path: PathBuf,
    lock: Mutex<()>,
}

impl UserDirectory {
    /// Create a directory stored at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(UserDirectoryInner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// All accounts, in registration order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the file cannot be read or parsed.
    pub async fn list(&self) -> Result<Vec<RegisteredUser>, RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        self.load().await
    }

    /// Find an account by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the file cannot be read or parsed.
    pub async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<RegisteredUser>, RepositoryError> {
        let users = self.list().await?;
        Ok(users.into_iter().find(|u| u.email.same_address(email)))
    }

    /// Add an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateEmail` if the email is taken, or
    /// another `RepositoryError` if the file cannot be read or written.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: RegisteredUser) -> Result<(), RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        let mut users = self.load().await?;

        if users.iter().any(|u| u.email.same_address(&user.email)) {
            return Err(RepositoryError::DuplicateEmail);
        }

        users.push(user);
        self.store(&users).await?;
        tracing::info!(accounts = users.len(), "Registered demo account");
        Ok(())
    }

    /// Look up an account by exact email and password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the file cannot be read or parsed.
    pub async fn authenticate(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<RegisteredUser>, RepositoryError> {
        Ok(self
            .find_by_email(email)
            .await?
            .filter(|u| u.password == password))
    }

    async fn load(&self) -> Result<Vec<RegisteredUser>, RepositoryError> {
        let path = &self.inner.path;
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(RepositoryError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| RepositoryError::DataCorruption {
            path: path.display().to_string(),
            source,
        })
    }

    async fn store(&self, users: &[RegisteredUser]) -> Result<(), RepositoryError> {
        let path = &self.inner.path;
        let io_err = |source| RepositoryError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let json = serde_json::to_vec_pretty(users).map_err(|source| {
            RepositoryError::DataCorruption {
                path: path.display().to_string(),
                source,
            }
        })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }
}
