//! Directory-backed store: one file per record key.
//!
//! Every write goes to its own uniquely named temp file in the same
//! directory, is synced, and is then renamed over the target, so each
//! record is replaced atomically even when writers overlap.  On Unix the
//! directory is owner-only (0700) and each record file is 0600.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{validate_key, SecureKeyValueStore};
use crate::errors::{Result, VaultError};

/// A `SecureKeyValueStore` persisted as files under one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            VaultError::Storage(format!(
                "cannot create store directory {}: {e}",
                root.display()
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            fs::set_permissions(&root, perms).await.map_err(|e| {
                VaultError::Storage(format!("failed to restrict store directory: {e}"))
            })?;
        }

        debug!("Opened file store at {}", root.display());
        Ok(Self { root })
    }

    /// Returns the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// A fresh temp path per write.  Record keys never start with a
    /// period, so temp files cannot collide with records.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(format!(".{}.tmp", uuid::Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl SecureKeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        match fs::read(self.record_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::Storage(format!("failed to read '{key}': {e}"))),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;
        let tmp_path = self.temp_path();

        if let Err(e) = write_synced(&tmp_path, value).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(VaultError::Storage(format!("failed to write '{key}': {e}")));
        }

        if let Err(e) = fs::rename(&tmp_path, self.record_path(key)).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(VaultError::Storage(format!("failed to commit '{key}': {e}")));
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        match fs::remove_file(self.record_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::Storage(format!("failed to delete '{key}': {e}"))),
        }
    }
}

/// Write `value` to a new file at `path` (0600 on Unix) and flush it to disk.
async fn write_synced(path: &Path, value: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
    }
    file.write_all(value).await?;
    file.sync_all().await
}
