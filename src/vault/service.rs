//! High-level vault operations used by the CLI and embedders.
//!
//! `PasswordVaultService` ties the PIN verifier, the cipher, and the
//! index together so callers work with simple calls like
//! `vault.store_entry(&entry, pin)`.
//!
//! The backend has no cross-key transactions, so writes are ordered to
//! keep the orphan window small:
//! - create: entry record first, then the index.
//! - delete: index first, then the entry record.
//!
//! Each pair runs under `entry_lock`, so overlapping calls on one id
//! cannot interleave into an indexed id with no record.  A crash between
//! the two steps leaves at most an unindexed record, which is invisible
//! to listing.  There is no reconciliation pass.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::config::VaultConfig;
use super::entry::{entry_record_key, validate_entry_id, EntryMetadata, PasswordEntry, StoredEntry};
use super::index::VaultIndex;
use super::pin::{LockoutStatus, PinVerifier, VaultStatus};
use crate::errors::{Result, VaultError};
use crate::storage::SecureKeyValueStore;

/// The vault handle.  Create one per backend and share it.
pub struct PasswordVaultService {
    store: Arc<dyn SecureKeyValueStore>,
    verifier: PinVerifier,
    index: VaultIndex,
    entry_lock: Mutex<()>,
}

impl PasswordVaultService {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Build a service over `store`.  Fails with `Config` on a bad config.
    pub fn new(store: Arc<dyn SecureKeyValueStore>, config: VaultConfig) -> Result<Self> {
        let verifier = PinVerifier::new(store.clone(), config)?;
        let index = VaultIndex::new(store.clone());
        Ok(Self {
            store,
            verifier,
            index,
            entry_lock: Mutex::new(()),
        })
    }

    // ------------------------------------------------------------------
    // PIN lifecycle
    // ------------------------------------------------------------------

    /// Whether a PIN has been set.
    pub async fn status(&self) -> Result<VaultStatus> {
        self.verifier.status().await
    }

    /// Set the PIN for a new vault.
    pub async fn initialize(&self, pin: &str) -> Result<()> {
        self.verifier.initialize(pin).await
    }

    /// Check a PIN without touching any entry.
    pub async fn verify_pin(&self, pin: &str) -> Result<bool> {
        self.verifier.verify_pin(pin).await
    }

    /// Attempts left and cooldown remaining, for "N attempts remaining".
    pub async fn lockout_status(&self) -> LockoutStatus {
        self.verifier.lockout_status().await
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Encrypt and persist `entry`, returning its id.
    ///
    /// An empty `entry.id` gets a fresh UUID; an existing id is updated in
    /// place.  The PIN is verified first, so an entry is never sealed
    /// under a key that cannot be re-derived.
    pub async fn store_entry(&self, entry: &PasswordEntry, pin: &str) -> Result<String> {
        entry.validate()?;

        let id = if entry.id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            entry.id.clone()
        };

        let pin_key = self.verifier.unlock(pin).await?;
        let entry_key = pin_key.entry_key(&id)?;
        drop(pin_key);

        let stored = StoredEntry::seal(entry, &id, &entry_key)?;
        drop(entry_key);
        let record = stored.to_record()?;

        let added = {
            let _guard = self.entry_lock.lock().await;
            self.store.set(&entry_record_key(&id), &record).await?;
            self.index.add(&id).await?
        };

        if added {
            info!(entry_id = %id, "Stored new entry");
        } else {
            info!(entry_id = %id, "Updated entry");
        }
        Ok(id)
    }

    /// Decrypt one entry.
    ///
    /// Returns `Ok(None)` if no record exists for `id`, including ids that
    /// could never have been stored.  A wrong PIN or a tampered record
    /// fails with `AuthenticationFailed`.
    pub async fn get_entry(&self, id: &str, pin: &str) -> Result<Option<PasswordEntry>> {
        if validate_entry_id(id).is_err() {
            debug!("Lookup of malformed entry id");
            return Ok(None);
        }

        let Some(stored) = self.load_stored(id).await? else {
            debug!(entry_id = %id, "Entry not found");
            return Ok(None);
        };

        let pin_key = self.verifier.unlock(pin).await?;
        let entry_key = pin_key.entry_key(id)?;
        drop(pin_key);

        stored.unseal(&entry_key).map(Some)
    }

    /// Metadata for every indexed entry, in index order.
    ///
    /// Never decrypts and needs no PIN.  An indexed id without a record
    /// fails with `EntryNotFound`.
    pub async fn list_entries(&self) -> Result<Vec<EntryMetadata>> {
        let _guard = self.entry_lock.lock().await;
        let ids = self.index.list().await?;
        let mut entries = Vec::with_capacity(ids.len());

        for id in ids {
            let stored = self
                .load_stored(&id)
                .await?
                .ok_or_else(|| VaultError::EntryNotFound(id.clone()))?;
            entries.push(stored.metadata());
        }

        Ok(entries)
    }

    /// Remove an entry.  Deleting an absent id is a no-op.
    pub async fn delete_entry(&self, id: &str) -> Result<()> {
        validate_entry_id(id)?;

        let was_indexed = {
            let _guard = self.entry_lock.lock().await;
            let was_indexed = self.index.remove(id).await?;
            self.store.delete(&entry_record_key(id)).await?;
            was_indexed
        };

        if was_indexed {
            info!(entry_id = %id, "Deleted entry");
        } else {
            debug!(entry_id = %id, "Delete of unindexed entry");
        }
        Ok(())
    }

    /// Number of indexed entries.
    pub async fn entry_count(&self) -> Result<usize> {
        Ok(self.index.list().await?.len())
    }

    async fn load_stored(&self, id: &str) -> Result<Option<StoredEntry>> {
        match self.store.get(&entry_record_key(id)).await? {
            Some(bytes) => StoredEntry::from_record(id, &bytes).map(Some),
            None => Ok(None),
        }
    }
}
