use thiserror::Error;

/// All errors that can occur in PinVault.
///
/// Payloads only ever carry entry ids, record keys, or backend messages.
/// PINs, key bytes, and plaintext passwords never reach an error value.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Lifecycle errors ---
    #[error("Vault is not initialized — set a PIN first")]
    NotInitialized,

    #[error("Vault is already initialized")]
    AlreadyInitialized,

    // --- Input errors ---
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Authentication errors ---
    #[error("Authentication failed — wrong PIN or corrupted data")]
    AuthenticationFailed,

    #[error("Too many failed PIN attempts — try again in {retry_after_secs}s")]
    LockedOut { retry_after_secs: u64 },

    // --- Entry errors ---
    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    // --- Crypto errors ---
    #[error("Cryptographic failure: {0}")]
    Crypto(String),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupted vault record: {0}")]
    Corrupted(String),

    // --- Config errors ---
    #[error("Config error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for PinVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
