//! `pinvault list`: show entry metadata without decrypting.

use crate::cli::output;
use crate::cli::{open_service, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub async fn execute(cli: &Cli) -> Result<()> {
    let vault = open_service(cli).await?;
    let entries = vault.list_entries().await?;
    output::print_entries_table(&entries);
    Ok(())
}
