//! `pinvault status`: report initialization state and entry count.

use crate::cli::output;
use crate::cli::{open_service, Cli};
use crate::errors::Result;
use crate::vault::VaultStatus;

/// Execute the `status` command.
pub async fn execute(cli: &Cli) -> Result<()> {
    let vault = open_service(cli).await?;

    match vault.status().await? {
        VaultStatus::NotInitialized => {
            output::info("Vault is not initialized.");
            output::tip("Run `pinvault init` to choose a PIN.");
        }
        VaultStatus::Initialized => {
            let count = vault.entry_count().await?;
            let noun = if count == 1 { "entry" } else { "entries" };
            output::success(&format!("Vault is initialized ({count} {noun})."));
        }
    }

    Ok(())
}
