//! `pinvault get`: decrypt and print a single entry.

use crate::cli::output;
use crate::cli::{open_service, prompt_pin, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
pub async fn execute(cli: &Cli, id: &str, password_only: bool) -> Result<()> {
    let vault = open_service(cli).await?;
    let pin = prompt_pin()?;

    let entry = vault
        .get_entry(id, &pin)
        .await?
        .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;

    // Print the raw password to stdout (no decoration) so it can be
    // piped into other tools:  pinvault get <ID> --password-only | pbcopy
    if password_only {
        println!("{}", entry.password());
        return Ok(());
    }

    output::info(&format!("{} ({})", entry.title, entry.id));
    println!("username: {}", entry.username);
    println!("password: {}", entry.password());
    if let Some(website) = &entry.website {
        println!("website:  {website}");
    }
    if let Some(notes) = &entry.notes {
        println!("notes:    {notes}");
    }

    Ok(())
}
