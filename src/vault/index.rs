//! The entry index: which entry ids exist, in insertion order.
//!
//! Persisted as one JSON array under `password_index`.  Every mutation is
//! a read-modify-write of that single record, so mutations are serialized
//! behind `write_lock`; without it two overlapping `add`s could both read
//! the old array and the second write would drop the first id.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::{Result, VaultError};
use crate::storage::SecureKeyValueStore;

/// Record key of the index.
pub const INDEX_KEY: &str = "password_index";

/// Ordered set of entry ids backed by a single record.
pub struct VaultIndex {
    store: Arc<dyn SecureKeyValueStore>,
    write_lock: Mutex<()>,
}

impl VaultIndex {
    pub fn new(store: Arc<dyn SecureKeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// All ids, in the order they were first added.
    pub async fn list(&self) -> Result<Vec<String>> {
        self.load().await
    }

    /// Returns `true` if `id` is indexed.
    pub async fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.load().await?.iter().any(|existing| existing == id))
    }

    /// Add `id`.  Returns `false` (and writes nothing) if already present.
    pub async fn add(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut ids = self.load().await?;
        if ids.iter().any(|existing| existing == id) {
            return Ok(false);
        }

        ids.push(id.to_string());
        self.save(&ids).await?;
        debug!(entries = ids.len(), "Added entry to index");
        Ok(true)
    }

    /// Remove `id`.  Returns `false` (and writes nothing) if absent.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut ids = self.load().await?;
        let before = ids.len();
        ids.retain(|existing| existing != id);
        if ids.len() == before {
            return Ok(false);
        }

        self.save(&ids).await?;
        debug!(entries = ids.len(), "Removed entry from index");
        Ok(true)
    }

    /// Read the record; a missing record is an empty index.
    ///
    /// Duplicate ids are collapsed, keeping the first occurrence.
    async fn load(&self) -> Result<Vec<String>> {
        let Some(bytes) = self.store.get(INDEX_KEY).await? else {
            return Ok(Vec::new());
        };

        let raw: Vec<String> = serde_json::from_slice(&bytes)
            .map_err(|e| VaultError::Corrupted(format!("{INDEX_KEY}: {e}")))?;

        let mut ids: Vec<String> = Vec::with_capacity(raw.len());
        for id in raw {
            if ids.contains(&id) {
                warn!("Index lists entry '{id}' more than once; ignoring the duplicate");
                continue;
            }
            ids.push(id);
        }
        Ok(ids)
    }

    async fn save(&self, ids: &[String]) -> Result<()> {
        let bytes = serde_json::to_vec(ids)
            .map_err(|e| VaultError::Corrupted(format!("cannot serialize {INDEX_KEY}: {e}")))?;
        self.store.set(INDEX_KEY, &bytes).await
    }
}
