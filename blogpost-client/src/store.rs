//! Durable session state.
//!
//! The client persists exactly two things between runs: the session token
//! and the liked-posts set. Each lives in its own JSON file in the data
//! directory, mirroring the fixed-key storage the backend's web client
//! uses. A store created without a directory keeps everything in memory
//! only: loads find nothing, saves succeed without writing.
//!
//! Load errors distinguish absence (`Ok(None)`) from damage (`Err`), so
//! the caller can warn about a corrupt file instead of silently starting
//! a fresh session.

use std::path::{Path, PathBuf};

use thiserror::Error;

use blogpost_core::LikedSet;

const TOKEN_FILE: &str = "token.json";
const LIKED_POSTS_FILE: &str = "liked_posts.json";

/// Errors from durable storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// A state file held something that does not parse.
    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// File-backed store for the token and liked-posts set.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    data_dir: Option<PathBuf>,
}

impl StateStore {
    /// Create a store rooted at the given directory.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    /// Create a store that never touches disk.
    pub fn in_memory() -> Self {
        Self { data_dir: None }
    }

    /// The backing directory, when there is one.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    // ======== Token ========

    /// Load the persisted token. `Ok(None)` when no token file exists.
    pub async fn load_token(&self) -> Result<Option<String>, StoreError> {
        self.load_json(TOKEN_FILE).await
    }

    /// Persist the token, owner-readable only.
    pub async fn save_token(&self, token: &str) -> Result<(), StoreError> {
        self.save_json(TOKEN_FILE, &token).await
    }

    /// Delete the persisted token. Absence is not an error.
    pub async fn clear_token(&self) -> Result<(), StoreError> {
        self.delete(TOKEN_FILE).await
    }

    // ======== Liked posts ========

    /// Load the persisted liked set. `Ok(None)` when none was saved.
    pub async fn load_liked(&self) -> Result<Option<LikedSet>, StoreError> {
        self.load_json(LIKED_POSTS_FILE).await
    }

    /// Persist the liked set.
    pub async fn save_liked(&self, liked: &LikedSet) -> Result<(), StoreError> {
        self.save_json(LIKED_POSTS_FILE, liked).await
    }

    /// Delete the persisted liked set. Absence is not an error.
    pub async fn clear_liked(&self) -> Result<(), StoreError> {
        self.delete(LIKED_POSTS_FILE).await
    }

    // ======== Plumbing ========

    async fn load_json<D: serde::de::DeserializeOwned>(
        &self,
        file: &str,
    ) -> Result<Option<D>, StoreError> {
        let Some(dir) = &self.data_dir else {
            return Ok(None);
        };
        let path = dir.join(file);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    async fn save_json<S: serde::Serialize>(&self, file: &str, value: &S) -> Result<(), StoreError> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        tokio::fs::create_dir_all(dir).await?;
        set_dir_permissions_0700(dir).await?;

        let path = dir.join(file);
        let contents = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&path, contents).await?;
        set_file_permissions_0600(&path).await?;
        Ok(())
    }

    async fn delete(&self, file: &str) -> Result<(), StoreError> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        match tokio::fs::remove_file(dir.join(file)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
/// No-op on non-Unix platforms.
async fn set_file_permissions_0600(path: &Path) -> Result<(), StoreError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

/// Set directory permissions to 0700 (owner only) on Unix.
/// No-op on non-Unix platforms.
async fn set_dir_permissions_0700(path: &Path) -> Result<(), StoreError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700)).await?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
