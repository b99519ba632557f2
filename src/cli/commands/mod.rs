//! One module per subcommand, each exposing an `execute` function.

pub mod add;
pub mod completions;
pub mod delete;
pub mod get;
pub mod init;
pub mod list;
pub mod status;
pub mod verify;
