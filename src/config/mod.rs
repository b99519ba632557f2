//! File-based configuration (`.pinvault.toml`).

pub mod settings;

pub use settings::Settings;
