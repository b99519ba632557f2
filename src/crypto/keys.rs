//! Key material and HKDF-SHA256 sub-key derivation.
//!
//! The Argon2id output (the "PIN key") is never used directly.  From it
//! we derive:
//! - A unique **per-entry** encryption key for each entry id.
//! - A **PIN verifier**, whose base64 form is persisted as `pin_hash`.
//!
//! HKDF (RFC 5869) with distinct `info` strings makes the verifier
//! independent of every encryption key, so the stored hash reveals
//! nothing usable for decryption.

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding;
use crate::errors::{Result, VaultError};

/// Length of every symmetric key in the vault (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// HKDF context for the PIN verifier.
const PIN_VERIFIER_INFO: &[u8] = b"pinvault-pin-verifier";

/// A fixed-length symmetric key that zeroes its memory when dropped.
///
/// Keys are derived per operation and never persisted.  No `Clone`, no
/// `Serialize`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_LEN],
}

impl SymmetricKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub(crate) fn zeroed() -> Self {
        Self {
            bytes: [0u8; KEY_LEN],
        }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; KEY_LEN] {
        &mut self.bytes
    }

    /// Derive the encryption key for one entry from this PIN key.
    pub fn entry_key(&self, entry_id: &str) -> Result<SymmetricKey> {
        derive_entry_key(&self.bytes, entry_id)
    }

    /// Compute the persisted PIN hash for this PIN key.
    pub fn pin_hash(&self) -> Result<String> {
        let verifier = derive_pin_verifier(&self.bytes)?;
        Ok(encoding::encode(verifier.as_bytes()))
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Derive a per-entry encryption key from the PIN key.
///
/// `info` is `"pinvault-entry:<entry_id>"`, so a ciphertext copied onto
/// another entry id fails authentication.
pub fn derive_entry_key(pin_key: &[u8], entry_id: &str) -> Result<SymmetricKey> {
    let info = format!("pinvault-entry:{entry_id}");
    hkdf_derive(pin_key, info.as_bytes())
}

/// Derive the PIN verifier from the PIN key.
pub fn derive_pin_verifier(pin_key: &[u8]) -> Result<SymmetricKey> {
    hkdf_derive(pin_key, PIN_VERIFIER_INFO)
}

/// Compare a freshly computed PIN hash with the stored one in constant time.
pub fn verify_pin_hash(actual: &str, expected: &str) -> bool {
    actual.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Internal helper: run HKDF-SHA256 expand with the given `info`.
///
/// The extract step uses a zero salt; the input already has full
/// entropy relative to the PIN because it came out of Argon2id.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<SymmetricKey> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = SymmetricKey::zeroed();
    hk.expand(info, okm.as_mut_bytes())
        .map_err(|e| VaultError::Crypto(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let key = SymmetricKey::from_bytes([0x42; KEY_LEN]);
        let printed = format!("{key:?}");
        assert_eq!(printed, "SymmetricKey([REDACTED])");
        assert!(!printed.contains("42"));
    }

    #[test]
    fn entry_keys_are_bound_to_the_id() {
        let pin_key = SymmetricKey::from_bytes([0x11; KEY_LEN]);
        let a = pin_key.entry_key("entry-a").unwrap();
        let b = pin_key.entry_key("entry-b").unwrap();
        let a_again = pin_key.entry_key("entry-a").unwrap();

        assert_ne!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.as_bytes(), a_again.as_bytes());
    }

    #[test]
    fn verifier_differs_from_entry_keys() {
        let pin_key = [0x33u8; KEY_LEN];
        let verifier = derive_pin_verifier(&pin_key).unwrap();
        let entry = derive_entry_key(&pin_key, "pin-verifier").unwrap();
        assert_ne!(verifier.as_bytes(), entry.as_bytes());
        assert_ne!(verifier.as_bytes(), &pin_key);
    }

    #[test]
    fn pin_hash_comparison() {
        let hash = SymmetricKey::from_bytes([0x55; KEY_LEN]).pin_hash().unwrap();
        let other = SymmetricKey::from_bytes([0x56; KEY_LEN]).pin_hash().unwrap();

        assert!(verify_pin_hash(&hash, &hash));
        assert!(!verify_pin_hash(&hash, &other));
        assert!(!verify_pin_hash(&hash, ""));
    }
}
