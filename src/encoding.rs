//! Base64 helpers shared by the persisted record types.
//!
//! Byte fields (salt, nonce, ciphertext) are stored as standard base64
//! strings so every record on the key-value backend is plain text.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::errors::{Result, VaultError};

/// Encode raw bytes as standard base64.
pub fn encode(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode a standard base64 string, naming `what` in the error.
pub fn decode(what: &str, encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| VaultError::Corrupted(format!("{what} is not valid base64: {e}")))
}

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_surrounding_whitespace() {
        let encoded = format!(" {}\n", encode(b"salt-bytes"));
        assert_eq!(decode("salt", &encoded).unwrap(), b"salt-bytes");
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode("salt", "not*base64!").unwrap_err();
        assert!(matches!(err, VaultError::Corrupted(msg) if msg.contains("salt")));
    }
}
