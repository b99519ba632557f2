//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! returns it alongside the ciphertext in an `EncryptedBlob`.  The blob
//! is persisted as `{ "iv": <base64>, "encryptedData": <base64> }`, where
//! `encryptedData` is the ciphertext followed by the 16-byte auth tag.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::keys::SymmetricKey;
use crate::encoding::{base64_decode, base64_encode};
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of one `encrypt` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    /// Random per-encryption nonce.
    #[serde(
        rename = "iv",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub nonce: Vec<u8>,

    /// Ciphertext with the auth tag appended.
    #[serde(
        rename = "encryptedData",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<EncryptedBlob> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Crypto(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::Crypto(format!("encryption error: {e}")))?;

    Ok(EncryptedBlob {
        nonce: nonce.to_vec(),
        ciphertext,
    })
}

/// Decrypt a blob produced by `encrypt`.
///
/// A wrong key, a tampered nonce or ciphertext, and a malformed blob all
/// fail with `AuthenticationFailed`; no plaintext is returned on failure.
pub fn decrypt(key: &SymmetricKey, blob: &EncryptedBlob) -> Result<Zeroizing<Vec<u8>>> {
    if blob.nonce.len() != NONCE_LEN || blob.ciphertext.len() < TAG_LEN {
        return Err(VaultError::AuthenticationFailed);
    }

    let nonce = Nonce::from_slice(&blob.nonce);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| VaultError::AuthenticationFailed)?;

    let plaintext = cipher
        .decrypt(nonce, blob.ciphertext.as_slice())
        .map_err(|_| VaultError::AuthenticationFailed)?;

    Ok(Zeroizing::new(plaintext))
}
