//! Integration tests for the PinVault crypto module.

use pinvault::crypto::keys::{derive_entry_key, derive_pin_verifier};
use pinvault::crypto::{decrypt, derive_key, encrypt, generate_salt, KdfParams, SymmetricKey};
use pinvault::errors::VaultError;

fn test_key(byte: u8) -> SymmetricKey {
    SymmetricKey::from_bytes([byte; 32])
}

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = test_key(0xAB);
    let plaintext = b"correct horse battery staple";

    let blob = encrypt(&key, plaintext).expect("encrypt should succeed");

    // 12-byte nonce, ciphertext carries the 16-byte tag.
    assert_eq!(blob.nonce.len(), 12);
    assert_eq!(blob.ciphertext.len(), plaintext.len() + 16);

    let recovered = decrypt(&key, &blob).expect("decrypt should succeed");
    assert_eq!(recovered.as_slice(), plaintext);
}

#[test]
fn encrypt_produces_different_ciphertext_each_time() {
    let key = test_key(0xCD);
    let plaintext = b"hunter2";

    let b1 = encrypt(&key, plaintext).expect("encrypt 1");
    let b2 = encrypt(&key, plaintext).expect("encrypt 2");

    // Each call draws a new random nonce, so the output must differ.
    assert_ne!(b1.nonce, b2.nonce);
    assert_ne!(b1.ciphertext, b2.ciphertext);
}

#[test]
fn decrypt_with_wrong_key_fails() {
    let blob = encrypt(&test_key(0x11), b"TOP_SECRET").expect("encrypt");
    let result = decrypt(&test_key(0x22), &blob);
    assert!(matches!(result, Err(VaultError::AuthenticationFailed)));
}

#[test]
fn tampered_ciphertext_is_rejected() {
    let key = test_key(0x33);
    let mut blob = encrypt(&key, b"do not touch").expect("encrypt");
    blob.ciphertext[0] ^= 0x01;
    assert!(matches!(
        decrypt(&key, &blob),
        Err(VaultError::AuthenticationFailed)
    ));
}

#[test]
fn tampered_nonce_is_rejected() {
    let key = test_key(0x44);
    let mut blob = encrypt(&key, b"do not touch").expect("encrypt");
    blob.nonce[11] ^= 0x80;
    assert!(decrypt(&key, &blob).is_err());
}

#[test]
fn empty_plaintext_roundtrips() {
    let key = test_key(0x55);
    let blob = encrypt(&key, b"").expect("encrypt");
    assert_eq!(blob.ciphertext.len(), 16);
    assert!(decrypt(&key, &blob).expect("decrypt").is_empty());
}

#[test]
fn blob_serializes_with_iv_and_encrypted_data() {
    let blob = encrypt(&test_key(0x66), b"x").expect("encrypt");
    let json = serde_json::to_value(&blob).expect("serialize");
    assert!(json.get("iv").and_then(|v| v.as_str()).is_some());
    assert!(json.get("encryptedData").and_then(|v| v.as_str()).is_some());
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn kdf_is_deterministic_for_same_pin_and_salt() {
    let salt = [7u8; 16];
    let params = KdfParams::minimum();

    let k1 = derive_key("1234", &salt, &params).expect("derive 1");
    let k2 = derive_key("1234", &salt, &params).expect("derive 2");
    assert_eq!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn kdf_differs_for_different_salt_or_pin() {
    let params = KdfParams::minimum();
    let base = derive_key("1234", &[1u8; 16], &params).unwrap();
    let other_salt = derive_key("1234", &[2u8; 16], &params).unwrap();
    let other_pin = derive_key("1235", &[1u8; 16], &params).unwrap();

    assert_ne!(base.as_bytes(), other_salt.as_bytes());
    assert_ne!(base.as_bytes(), other_pin.as_bytes());
}

#[test]
fn kdf_rejects_short_salt() {
    let result = derive_key("1234", &[0u8; 8], &KdfParams::minimum());
    assert!(result.is_err());
}

#[test]
fn generated_salts_are_unique() {
    let s1 = generate_salt(16).unwrap();
    let s2 = generate_salt(16).unwrap();
    assert_eq!(s1.len(), 16);
    assert_ne!(s1, s2);
}

#[test]
fn sub_keys_are_domain_separated() {
    let pin_key = [9u8; 32];
    let a = derive_entry_key(&pin_key, "a").unwrap();
    let b = derive_entry_key(&pin_key, "b").unwrap();
    let verifier = derive_pin_verifier(&pin_key).unwrap();

    assert_ne!(a.as_bytes(), b.as_bytes());
    assert_ne!(a.as_bytes(), verifier.as_bytes());
    assert_ne!(a.as_bytes(), &pin_key);
}
