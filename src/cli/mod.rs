//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::storage::{FileStore, SecureKeyValueStore};
use crate::vault::PasswordVaultService;

/// Environment variable consulted before prompting for the PIN.
pub const PIN_ENV_VAR: &str = "PINVAULT_PIN";

/// PinVault CLI: PIN-protected password vault.
#[derive(Parser)]
#[command(name = "pinvault", about = "PIN-protected local password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the vault records (default: from .pinvault.toml, else .pinvault)
    #[arg(long, global = true)]
    pub store_dir: Option<String>,

    /// Keep vault records in the OS keyring instead of a directory
    #[cfg(feature = "keyring-store")]
    #[arg(long, global = true)]
    pub keyring: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Set the PIN for a new vault
    Init,

    /// Show whether the vault is initialized and how many entries it holds
    Status,

    /// Check a PIN without opening any entry
    Verify,

    /// Add an entry, or update it when --id names an existing one
    Add {
        /// Entry title (e.g. gmail)
        title: String,
        /// Account username or email
        username: String,
        /// Password (omit for interactive prompt or piped stdin)
        password: Option<String>,
        /// Website the credential belongs to
        #[arg(long)]
        website: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Entry id to create or overwrite (default: new UUID)
        #[arg(long)]
        id: Option<String>,
    },

    /// Decrypt and show an entry
    Get {
        /// Entry id
        id: String,
        /// Print only the password (for scripting)
        #[arg(long)]
        password_only: bool,
    },

    /// List all entries (no PIN required, passwords stay encrypted)
    List,

    /// Delete an entry
    Delete {
        /// Entry id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the record directory from the CLI arguments and settings.
pub fn store_dir(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.store_dir {
        Some(dir) => cwd.join(dir),
        None => settings.store_path(&cwd),
    })
}

/// Load settings from the working directory and open the vault service.
pub async fn open_service(cli: &Cli) -> Result<PasswordVaultService> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let config = settings.vault_config()?;
    let store = open_store(cli, &settings).await?;
    PasswordVaultService::new(store, config)
}

async fn open_store(cli: &Cli, settings: &Settings) -> Result<Arc<dyn SecureKeyValueStore>> {
    #[cfg(feature = "keyring-store")]
    if cli.keyring {
        return Ok(Arc::new(crate::storage::KeyringStore::default()));
    }

    let dir = store_dir(cli, settings)?;
    Ok(Arc::new(FileStore::open(dir).await?))
}

/// Get the PIN, trying `PINVAULT_PIN` first, then an interactive prompt.
///
/// Returns `Zeroizing<String>` so the PIN is wiped from memory on drop.
pub fn prompt_pin() -> Result<Zeroizing<String>> {
    if let Some(pin) = pin_from_env() {
        return Ok(pin);
    }

    let pin = dialoguer::Password::new()
        .with_prompt("Enter PIN")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("PIN prompt: {e}")))?;
    Ok(Zeroizing::new(pin))
}

/// Prompt for a new PIN with confirmation (used during `init`).
///
/// Also respects `PINVAULT_PIN` for scripted usage.  The PIN policy is
/// enforced by the vault itself.
pub fn prompt_new_pin() -> Result<Zeroizing<String>> {
    if let Some(pin) = pin_from_env() {
        return Ok(pin);
    }

    let pin = dialoguer::Password::new()
        .with_prompt("Choose a PIN")
        .with_confirmation("Confirm PIN", "PINs do not match, try again")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("PIN prompt: {e}")))?;
    Ok(Zeroizing::new(pin))
}

fn pin_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PIN_ENV_VAR) {
        Ok(pin) if !pin.is_empty() => Some(Zeroizing::new(pin)),
        _ => None,
    }
}

/// Get an entry password from the argument, piped stdin, or a prompt.
pub fn read_entry_password(inline: Option<&str>, title: &str) -> Result<Zeroizing<String>> {
    if let Some(value) = inline {
        output::warning("Password provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(value.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']);
        return Ok(Zeroizing::new(trimmed.to_string()));
    }

    let value = dialoguer::Password::new()
        .with_prompt(format!("Password for {title}"))
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}
