//! Vault module: PIN management and encrypted entry storage.
//!
//! This module provides:
//! - Service configuration (`config`)
//! - `PasswordEntry`, `StoredEntry`, and `EntryMetadata` types (`entry`)
//! - The persisted entry index (`index`)
//! - Salt / PIN hash lifecycle and attempt lockout (`pin`)
//! - High-level `PasswordVaultService` for CRUD over entries (`service`)

pub mod config;
pub mod entry;
pub mod index;
pub mod pin;
pub mod service;

// Re-export the most commonly used items.
pub use config::{LockoutPolicy, PinPolicy, VaultConfig};
pub use entry::{EntryMetadata, PasswordEntry, StoredEntry};
pub use index::VaultIndex;
pub use pin::{AttemptTracker, LockoutStatus, PinVerifier, VaultStatus};
pub use service::PasswordVaultService;
