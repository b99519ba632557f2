//! `pinvault add`: encrypt and store a password entry.

use crate::cli::output;
use crate::cli::{open_service, prompt_pin, read_entry_password, Cli};
use crate::errors::Result;
use crate::vault::PasswordEntry;

/// Arguments of the `add` command.
pub struct AddArgs<'a> {
    pub title: &'a str,
    pub username: &'a str,
    pub password: Option<&'a str>,
    pub website: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub id: Option<&'a str>,
}

/// Execute the `add` command.
pub async fn execute(cli: &Cli, args: AddArgs<'_>) -> Result<()> {
    let vault = open_service(cli).await?;

    let password = read_entry_password(args.password, args.title)?;
    let mut entry = PasswordEntry::new(args.title, args.username, password.as_str());
    if let Some(id) = args.id {
        entry = entry.with_id(id);
    }
    if let Some(website) = args.website {
        entry = entry.with_website(website);
    }
    if let Some(notes) = args.notes {
        entry = entry.with_notes(notes);
    }
    // Catch missing fields before asking for the PIN.
    entry.validate()?;

    let pin = prompt_pin()?;
    let id = vault.store_entry(&entry, &pin).await?;

    output::success(&format!("Stored '{}' as {id}", args.title));
    Ok(())
}
