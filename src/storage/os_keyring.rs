//! OS keyring backend.
//!
//! Stores each vault record as a separate credential in the operating
//! system's secure credential store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KDE Wallet)
//!
//! Keyring calls block on platform IPC, so they run on the blocking pool.

use async_trait::async_trait;

use super::{validate_key, SecureKeyValueStore};
use crate::errors::{Result, VaultError};

/// Default service name used in the OS keyring.
pub const DEFAULT_SERVICE: &str = "pinvault";

/// A `SecureKeyValueStore` backed by the platform keyring.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Use `service` as the keyring service name for every record.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(service: &str, key: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(service, key).map_err(|e| {
            VaultError::Storage(format!("failed to open keyring entry '{key}': {e}"))
        })
    }

    async fn run_blocking<T, F>(&self, key: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(keyring::Entry) -> Result<T> + Send + 'static,
    {
        validate_key(key)?;
        let entry = Self::entry(&self.service, key)?;
        tokio::task::spawn_blocking(move || op(entry))
            .await
            .map_err(|e| VaultError::Storage(format!("keyring task failed: {e}")))?
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

#[async_trait]
impl SecureKeyValueStore for KeyringStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let name = key.to_string();
        self.run_blocking(key, move |entry| match entry.get_secret() {
            Ok(bytes) => Ok(Some(bytes)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(VaultError::Storage(format!(
                "failed to read '{name}' from keyring: {e}"
            ))),
        })
        .await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let name = key.to_string();
        let value = value.to_vec();
        self.run_blocking(key, move |entry| {
            entry.set_secret(&value).map_err(|e| {
                VaultError::Storage(format!("failed to store '{name}' in keyring: {e}"))
            })
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let name = key.to_string();
        self.run_blocking(key, move |entry| match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(VaultError::Storage(format!(
                "failed to delete '{name}' from keyring: {e}"
            ))),
        })
        .await
    }
}
