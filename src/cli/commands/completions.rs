//! `pinvault completions`: print a shell completion script to stdout.
//!
//! Usage:
//!   pinvault completions bash > ~/.local/share/bash-completion/completions/pinvault
//!   pinvault completions zsh > "${fpath[1]}/_pinvault"

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// Accepted shell names and the aliases users commonly type.
const SHELLS: &[(&str, Shell)] = &[
    ("bash", Shell::Bash),
    ("zsh", Shell::Zsh),
    ("fish", Shell::Fish),
    ("powershell", Shell::PowerShell),
    ("pwsh", Shell::PowerShell),
    ("ps", Shell::PowerShell),
    ("elvish", Shell::Elvish),
];

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}

fn parse_shell(name: &str) -> Result<Shell> {
    let wanted = name.trim().to_ascii_lowercase();
    SHELLS
        .iter()
        .find(|(alias, _)| *alias == wanted)
        .map(|(_, shell)| *shell)
        .ok_or_else(|| {
            VaultError::InvalidInput(format!(
                "unknown shell '{name}' (supported: bash, zsh, fish, powershell, elvish)"
            ))
        })
}
