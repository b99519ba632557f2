//! Entry types: the transient plaintext form and the persisted form.
//!
//! `PasswordEntry` carries the plaintext password and is deliberately not
//! `Serialize`, so it cannot be written to the backend by accident.
//! `StoredEntry` is the only persisted shape and can only be built by
//! sealing a `PasswordEntry` under an entry key.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{decrypt, encrypt, EncryptedBlob, SymmetricKey};
use crate::errors::{Result, VaultError};
use crate::storage::{is_key_charset, MAX_KEY_LEN};

/// Prefix of every entry record key: `password_<id>`.
pub const ENTRY_KEY_PREFIX: &str = "password_";

/// Longest entry id that still fits in a record key.
pub const MAX_ENTRY_ID_LEN: usize = MAX_KEY_LEN - ENTRY_KEY_PREFIX.len();

/// Record key under which the entry `id` is stored.
pub fn entry_record_key(id: &str) -> String {
    format!("{ENTRY_KEY_PREFIX}{id}")
}

/// Validate a caller-supplied entry id.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
pub fn validate_entry_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(VaultError::Validation("entry id cannot be empty".into()));
    }
    if id.len() > MAX_ENTRY_ID_LEN {
        return Err(VaultError::Validation(format!(
            "entry id cannot exceed {MAX_ENTRY_ID_LEN} characters"
        )));
    }
    if !is_key_charset(id) {
        return Err(VaultError::Validation(format!(
            "entry id '{id}' contains invalid characters — only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }
    Ok(())
}

/// A credential as the caller sees it, with the password in plaintext.
///
/// An empty `id` asks `store_entry` to assign a fresh one.
#[derive(Clone)]
pub struct PasswordEntry {
    pub id: String,
    pub title: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

impl PasswordEntry {
    /// A new entry without an id; one is assigned when it is stored.
    pub fn new(
        title: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            username: username.into(),
            password: Zeroizing::new(password.into()),
            website: None,
            notes: None,
        }
    }

    /// Target an existing id (update in place) or choose the id up front.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// The plaintext password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Check the required fields (title, username, password).
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(VaultError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }
        if !self.id.is_empty() {
            validate_entry_id(&self.id)?;
        }
        Ok(())
    }
}

impl fmt::Debug for PasswordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordEntry")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("website", &self.website)
            .field("notes", &self.notes)
            .finish()
    }
}

/// The persisted form of an entry, stored as JSON under `password_<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntry {
    pub id: String,
    pub title: String,
    pub username: String,
    pub encrypted_password: EncryptedBlob,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StoredEntry {
    /// Encrypt `entry`'s password under `entry_key` and store it as `id`.
    pub fn seal(entry: &PasswordEntry, id: &str, entry_key: &SymmetricKey) -> Result<Self> {
        let encrypted_password = encrypt(entry_key, entry.password.as_bytes())?;
        Ok(Self {
            id: id.to_string(),
            title: entry.title.clone(),
            username: entry.username.clone(),
            encrypted_password,
            website: entry.website.clone(),
            notes: entry.notes.clone(),
        })
    }

    /// Decrypt the password and rebuild the caller-facing entry.
    pub fn unseal(&self, entry_key: &SymmetricKey) -> Result<PasswordEntry> {
        let plaintext = decrypt(entry_key, &self.encrypted_password)?;

        // On error, zeroize the bytes inside the error before discarding.
        let password = String::from_utf8(plaintext.to_vec()).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::Corrupted(format!("password of entry '{}' is not valid UTF-8", self.id))
        })?;

        Ok(PasswordEntry {
            id: self.id.clone(),
            title: self.title.clone(),
            username: self.username.clone(),
            password: Zeroizing::new(password),
            website: self.website.clone(),
            notes: self.notes.clone(),
        })
    }

    /// Everything except the password.
    pub fn metadata(&self) -> EntryMetadata {
        EntryMetadata {
            id: self.id.clone(),
            title: self.title.clone(),
            username: self.username.clone(),
            website: self.website.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Serialize for the backend.
    pub fn to_record(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            VaultError::Corrupted(format!("cannot serialize entry '{}': {e}", self.id))
        })
    }

    /// Parse a backend record stored under `id`.
    pub fn from_record(id: &str, bytes: &[u8]) -> Result<Self> {
        let stored: StoredEntry = serde_json::from_slice(bytes)
            .map_err(|e| VaultError::Corrupted(format!("entry '{id}': {e}")))?;
        if stored.id != id {
            return Err(VaultError::Corrupted(format!(
                "entry record '{id}' claims id '{}'",
                stored.id
            )));
        }
        Ok(stored)
    }
}

/// Listing projection of an entry; carries no password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    pub id: String,
    pub title: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
