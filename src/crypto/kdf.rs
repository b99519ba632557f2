//! PIN-based key derivation using Argon2id.
//!
//! A 4-digit PIN has only 10 000 candidates, so every guess must pay the
//! full memory-hard Argon2id cost.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};

use super::keys::{SymmetricKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Shortest salt accepted anywhere in the vault (128 bits).
pub const MIN_SALT_LEN: usize = 16;

/// Salt length used for new vaults unless configured otherwise.
pub const DEFAULT_SALT_LEN: usize = 16;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Argon2id work parameters.
///
/// Persisted next to the salt (as `kdf_params`) so a vault keeps
/// deriving the same key even if the configured defaults change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of passes over memory (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// The cheapest parameters `validate` still accepts.
    ///
    /// Intended for tests; real vaults should use the defaults.
    pub const fn minimum() -> Self {
        Self {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// Reject parameters weak enough to make PIN brute force cheap.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::InvalidInput(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(VaultError::InvalidInput(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(VaultError::InvalidInput(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Derive a 32-byte key from a PIN and salt.
///
/// The same PIN + salt + params always produce the same key.  Fails with
/// `InvalidInput` for an empty PIN, a short salt, or weak parameters.
pub fn derive_key(pin: &str, salt: &[u8], kdf_params: &KdfParams) -> Result<SymmetricKey> {
    if pin.is_empty() {
        return Err(VaultError::InvalidInput("PIN cannot be empty".into()));
    }
    if salt.len() < MIN_SALT_LEN {
        return Err(VaultError::InvalidInput(format!(
            "salt must be at least {MIN_SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    kdf_params.validate()?;

    let params = Params::new(
        kdf_params.memory_kib,
        kdf_params.iterations,
        kdf_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::InvalidInput(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = SymmetricKey::zeroed();
    argon2
        .hash_password_into(pin.as_bytes(), salt, key.as_mut_bytes())
        .map_err(|e| VaultError::Crypto(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random salt of `len` bytes.
pub fn generate_salt(len: usize) -> Result<Vec<u8>> {
    if len < MIN_SALT_LEN {
        return Err(VaultError::InvalidInput(format!(
            "salt must be at least {MIN_SALT_LEN} bytes (got {len})"
        )));
    }

    let mut salt = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| VaultError::Crypto(format!("OS random generator failed: {e}")))?;
    Ok(salt)
}
