//! `pinvault verify`: check a PIN without decrypting anything.

use crate::cli::output;
use crate::cli::{open_service, prompt_pin, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `verify` command.
pub async fn execute(cli: &Cli) -> Result<()> {
    let vault = open_service(cli).await?;
    let pin = prompt_pin()?;

    if vault.verify_pin(&pin).await? {
        output::success("PIN is correct.");
        return Ok(());
    }

    let status = vault.lockout_status().await;
    match status.locked_for {
        Some(cooldown) => output::warning(&format!(
            "Too many failed attempts. Try again in {}s.",
            cooldown.as_secs().max(1)
        )),
        None => output::warning(&format!(
            "{} attempt(s) remaining.",
            status.attempts_remaining
        )),
    }
    Err(VaultError::AuthenticationFailed)
}
