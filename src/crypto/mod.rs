//! Cryptographic primitives for PinVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id PIN-based key derivation (`kdf`)
//! - HKDF-based per-entry key and PIN verifier derivation (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, EncryptedBlob};
pub use kdf::{derive_key, generate_salt, KdfParams};
pub use keys::{verify_pin_hash, SymmetricKey, KEY_LEN};
