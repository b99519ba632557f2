//! `pinvault init`: set the PIN for a new vault.

use crate::cli::output;
use crate::cli::{open_service, prompt_new_pin, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::VaultStatus;

/// Execute the `init` command.
pub async fn execute(cli: &Cli) -> Result<()> {
    let vault = open_service(cli).await?;

    // 1. Refuse early so the user is not asked for a PIN for nothing.
    if vault.status().await? == VaultStatus::Initialized {
        output::tip("Use `pinvault add` to store entries in the existing vault.");
        return Err(VaultError::AlreadyInitialized);
    }

    // 2. Prompt for the new PIN (with confirmation) and create the vault.
    let pin = prompt_new_pin()?;
    vault.initialize(&pin).await?;
    output::success("Vault initialized.");

    // 3. Show helpful tips.
    output::tip("Run `pinvault add <TITLE> <USERNAME>` to store a password.");
    output::tip("Run `pinvault list` to see all entries.");

    Ok(())
}
