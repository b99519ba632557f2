//! Construction-time configuration for the vault services.
//!
//! Every tunable lives here and is handed to `PasswordVaultService::new`;
//! nothing is read from globals.

use std::time::Duration;

use crate::crypto::kdf::{KdfParams, DEFAULT_SALT_LEN, MIN_SALT_LEN};
use crate::errors::{Result, VaultError};

/// Which PINs `initialize` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinPolicy {
    /// Shortest accepted PIN, in characters.
    pub min_len: usize,
    /// Longest accepted PIN, in characters.
    pub max_len: usize,
    /// Only ASCII digits allowed.
    pub digits_only: bool,
}

impl Default for PinPolicy {
    fn default() -> Self {
        Self {
            min_len: 4,
            max_len: 8,
            digits_only: true,
        }
    }
}

impl PinPolicy {
    /// Check `pin` against the policy, describing the first violation.
    pub fn check(&self, pin: &str) -> Result<()> {
        let len = pin.chars().count();
        if len < self.min_len || len > self.max_len {
            let expected = if self.min_len == self.max_len {
                format!("exactly {}", self.min_len)
            } else {
                format!("{} to {}", self.min_len, self.max_len)
            };
            return Err(VaultError::Validation(format!(
                "PIN must be {expected} characters long"
            )));
        }
        if self.digits_only && !pin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VaultError::Validation(
                "PIN must contain only digits".into(),
            ));
        }
        Ok(())
    }

    /// `true` if `pin` could ever have been set under this policy.
    pub fn accepts(&self, pin: &str) -> bool {
        self.check(pin).is_ok()
    }
}

/// Longest cooldown `VaultConfig::validate` accepts (one day).
pub const MAX_LOCKOUT_COOLDOWN: Duration = Duration::from_secs(24 * 60 * 60);

/// Failed-attempt throttling for PIN verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Consecutive failures that trigger the cooldown.
    pub max_attempts: u32,
    /// How long verification is refused once triggered.
    pub cooldown: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            cooldown: Duration::from_secs(60),
        }
    }
}

/// Everything a `PasswordVaultService` needs besides its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultConfig {
    /// Argon2id parameters for new vaults.
    pub kdf: KdfParams,
    /// Salt length for new vaults, in bytes.
    pub salt_len: usize,
    pub pin_policy: PinPolicy,
    pub lockout: LockoutPolicy,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf: KdfParams::default(),
            salt_len: DEFAULT_SALT_LEN,
            pin_policy: PinPolicy::default(),
            lockout: LockoutPolicy::default(),
        }
    }
}

impl VaultConfig {
    /// Reject configurations that would weaken or break the vault.
    pub fn validate(&self) -> Result<()> {
        self.kdf
            .validate()
            .map_err(|e| VaultError::Config(e.to_string()))?;

        if self.salt_len < MIN_SALT_LEN {
            return Err(VaultError::Config(format!(
                "salt length must be at least {MIN_SALT_LEN} bytes (got {})",
                self.salt_len
            )));
        }
        if self.pin_policy.min_len == 0 {
            return Err(VaultError::Config(
                "minimum PIN length must be at least 1".into(),
            ));
        }
        if self.pin_policy.min_len > self.pin_policy.max_len {
            return Err(VaultError::Config(format!(
                "minimum PIN length {} exceeds maximum {}",
                self.pin_policy.min_len, self.pin_policy.max_len
            )));
        }
        if self.lockout.max_attempts == 0 {
            return Err(VaultError::Config(
                "max PIN attempts must be at least 1".into(),
            ));
        }
        if self.lockout.cooldown > MAX_LOCKOUT_COOLDOWN {
            return Err(VaultError::Config(format!(
                "lockout cooldown of {}s exceeds the maximum of {}s",
                self.lockout.cooldown.as_secs(),
                MAX_LOCKOUT_COOLDOWN.as_secs()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_accepts_four_digit_pins() {
        let policy = PinPolicy::default();
        assert!(policy.accepts("1234"));
        assert!(policy.accepts("00000000"));
        assert!(!policy.accepts("123"));
        assert!(!policy.accepts("123456789"));
        assert!(!policy.accepts("12a4"));
        assert!(!policy.accepts(""));
    }

    #[test]
    fn exact_length_message() {
        let policy = PinPolicy {
            min_len: 4,
            max_len: 4,
            digits_only: true,
        };
        let err = policy.check("12345").unwrap_err();
        assert!(err.to_string().contains("exactly 4"));
    }

    #[test]
    fn alphanumeric_policy() {
        let policy = PinPolicy {
            digits_only: false,
            ..PinPolicy::default()
        };
        assert!(policy.accepts("ab12"));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(VaultConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let short_salt = VaultConfig {
            salt_len: 8,
            ..VaultConfig::default()
        };
        assert!(matches!(short_salt.validate(), Err(VaultError::Config(_))));

        let inverted = VaultConfig {
            pin_policy: PinPolicy {
                min_len: 6,
                max_len: 4,
                digits_only: true,
            },
            ..VaultConfig::default()
        };
        assert!(inverted.validate().is_err());

        let no_attempts = VaultConfig {
            lockout: LockoutPolicy {
                max_attempts: 0,
                cooldown: Duration::from_secs(1),
            },
            ..VaultConfig::default()
        };
        assert!(no_attempts.validate().is_err());

        let endless_cooldown = VaultConfig {
            lockout: LockoutPolicy {
                max_attempts: 1,
                cooldown: Duration::from_secs(u64::MAX),
            },
            ..VaultConfig::default()
        };
        assert!(matches!(
            endless_cooldown.validate(),
            Err(VaultError::Config(_))
        ));

        let one_day = VaultConfig {
            lockout: LockoutPolicy {
                max_attempts: 1,
                cooldown: MAX_LOCKOUT_COOLDOWN,
            },
            ..VaultConfig::default()
        };
        assert!(one_day.validate().is_ok());

        let weak_kdf = VaultConfig {
            kdf: KdfParams {
                memory_kib: 16,
                iterations: 1,
                parallelism: 1,
            },
            ..VaultConfig::default()
        };
        assert!(matches!(weak_kdf.validate(), Err(VaultError::Config(_))));
    }
}
