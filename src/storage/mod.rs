//! Secure key-value backends.
//!
//! The vault only needs durable get/set/delete on opaque byte blobs
//! keyed by string.  Each backend guarantees atomicity per key and
//! nothing across keys; the vault layer sequences its writes around that.

mod file;
mod memory;

#[cfg(feature = "keyring-store")]
mod os_keyring;

use async_trait::async_trait;

use crate::errors::{Result, VaultError};

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(feature = "keyring-store")]
pub use os_keyring::KeyringStore;

/// Longest record key any backend must support.
pub const MAX_KEY_LEN: usize = 256;

/// Durable, per-key atomic storage for vault records.
///
/// Failures are reported as `VaultError::Storage`; implementations must
/// not retry on their own.
#[async_trait]
pub trait SecureKeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Create or replace the value under `key`.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`.  Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Validate that a record key is safe for every backend.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty, at most 256 characters, and not start with a period.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(VaultError::Storage("record key cannot be empty".into()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(VaultError::Storage(format!(
            "record key cannot exceed {MAX_KEY_LEN} characters"
        )));
    }
    if key.starts_with('.') {
        return Err(VaultError::Storage(format!(
            "record key '{key}' cannot start with a period"
        )));
    }
    if !is_key_charset(key) {
        return Err(VaultError::Storage(format!(
            "record key '{key}' contains invalid characters"
        )));
    }
    Ok(())
}

/// `true` if every byte is in the record key character set.
pub(crate) fn is_key_charset(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_vault_record_keys() {
        assert!(validate_key("encryption_salt").is_ok());
        assert!(validate_key("pin_hash").is_ok());
        assert!(validate_key("password_index").is_ok());
        assert!(validate_key("password_0f8fad5b-d9cb-469f-a165-70867728950e").is_ok());
    }

    #[test]
    fn rejects_unsafe_keys() {
        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("with space").is_err());
        assert!(validate_key("slash/inside").is_err());
        assert!(validate_key(&"k".repeat(MAX_KEY_LEN + 1)).is_err());
    }
}
