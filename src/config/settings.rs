use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KdfParams;
use crate::errors::{Result, VaultError};
use crate::vault::{LockoutPolicy, PinPolicy, VaultConfig};

/// Project-level configuration, loaded from `.pinvault.toml`.
///
/// Every field has a sensible default so PinVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) where vault records are stored.
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Salt length in bytes for new vaults (default: 16).
    #[serde(default = "default_salt_len")]
    pub salt_len: usize,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Shortest PIN accepted by `init` (default: 4).
    #[serde(default = "default_pin_min_length")]
    pub pin_min_length: usize,

    /// Longest PIN accepted by `init` (default: 8).
    #[serde(default = "default_pin_max_length")]
    pub pin_max_length: usize,

    /// Consecutive wrong PINs before the cooldown (default: 3).
    #[serde(default = "default_max_pin_attempts")]
    pub max_pin_attempts: u32,

    /// Cooldown length in seconds (default: 60).
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store_dir() -> String {
    ".pinvault".to_string()
}

fn default_salt_len() -> usize {
    16
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_pin_min_length() -> usize {
    4
}

fn default_pin_max_length() -> usize {
    8
}

fn default_max_pin_attempts() -> u32 {
    3
}

fn default_lockout_secs() -> u64 {
    60
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            salt_len: default_salt_len(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            pin_min_length: default_pin_min_length(),
            pin_max_length: default_pin_max_length(),
            max_pin_attempts: default_max_pin_attempts(),
            lockout_secs: default_lockout_secs(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".pinvault.toml";

    /// Load settings from `<project_dir>/.pinvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path of the record directory.
    ///
    /// Example: `project_dir/.pinvault`
    pub fn store_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.store_dir)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Build the service configuration, validating it.
    pub fn vault_config(&self) -> Result<VaultConfig> {
        let config = VaultConfig {
            kdf: self.kdf_params(),
            salt_len: self.salt_len,
            pin_policy: PinPolicy {
                min_len: self.pin_min_length,
                max_len: self.pin_max_length,
                digits_only: true,
            },
            lockout: LockoutPolicy {
                max_attempts: self.max_pin_attempts,
                cooldown: Duration::from_secs(self.lockout_secs),
            },
        };
        config.validate()?;
        Ok(config)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.store_dir, ".pinvault");
        assert_eq!(s.salt_len, 16);
        assert_eq!(s.argon2_memory_kib, 65_536);
        assert_eq!(s.argon2_iterations, 3);
        assert_eq!(s.argon2_parallelism, 4);
        assert_eq!(s.max_pin_attempts, 3);
        assert_eq!(s.lockout_secs, 60);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.store_dir, ".pinvault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
store_dir = "secrets"
salt_len = 32
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 8
pin_min_length = 6
pin_max_length = 6
max_pin_attempts = 5
lockout_secs = 300
"#;
        fs::write(tmp.path().join(".pinvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.store_dir, "secrets");
        assert_eq!(settings.salt_len, 32);
        assert_eq!(settings.argon2_memory_kib, 131_072);
        assert_eq!(settings.argon2_iterations, 5);
        assert_eq!(settings.argon2_parallelism, 8);

        let config = settings.vault_config().unwrap();
        assert_eq!(config.pin_policy.min_len, 6);
        assert_eq!(config.lockout.max_attempts, 5);
        assert_eq!(config.lockout.cooldown, Duration::from_secs(300));
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pinvault.toml"), "lockout_secs = 10\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.lockout_secs, 10);
        // Rest should be defaults
        assert_eq!(settings.store_dir, ".pinvault");
        assert_eq!(settings.argon2_iterations, 3);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pinvault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(VaultError::Config(_))));
    }

    #[test]
    fn vault_config_rejects_weak_settings() {
        let s = Settings {
            salt_len: 4,
            ..Settings::default()
        };
        assert!(s.vault_config().is_err());

        let s = Settings {
            argon2_memory_kib: 64,
            ..Settings::default()
        };
        assert!(s.vault_config().is_err());

        let s = Settings {
            lockout_secs: u64::MAX,
            ..Settings::default()
        };
        assert!(matches!(s.vault_config(), Err(VaultError::Config(_))));
    }

    #[test]
    fn store_path_respects_custom_dir() {
        let s = Settings {
            store_dir: "secrets".to_string(),
            ..Settings::default()
        };
        let project = Path::new("/home/user/myproject");
        assert_eq!(
            s.store_path(project),
            PathBuf::from("/home/user/myproject/secrets")
        );
    }
}
