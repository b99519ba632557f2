//! PIN lifecycle: salt + PIN hash creation, verification, and lockout.
//!
//! The vault is either `NotInitialized` or `Initialized`; `initialize`
//! is the only transition.  The salt and PIN hash are read and written
//! as one unit under `credentials_lock`, and a partially written pair
//! (crash during `initialize`) is treated as not initialized.
//!
//! Failed attempts are counted in memory only.  The counter resets when
//! the process restarts, which is a known weak point: an attacker who
//! can restart the process gets fresh attempts.  The on-disk defence is
//! the Argon2id cost of each guess.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::config::{LockoutPolicy, VaultConfig, MAX_LOCKOUT_COOLDOWN};
use crate::crypto::kdf::{derive_key, generate_salt, KdfParams, MIN_SALT_LEN};
use crate::crypto::{verify_pin_hash, SymmetricKey};
use crate::encoding;
use crate::errors::{Result, VaultError};
use crate::storage::SecureKeyValueStore;

/// Record key of the base64 salt.
pub const SALT_KEY: &str = "encryption_salt";

/// Record key of the PIN hash.
pub const PIN_HASH_KEY: &str = "pin_hash";

/// Record key of the Argon2id parameters the vault was created with.
pub const KDF_PARAMS_KEY: &str = "kdf_params";

/// Whether a PIN has been set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultStatus {
    NotInitialized,
    Initialized,
}

/// Snapshot of the failed-attempt counter for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutStatus {
    /// Attempts left before the cooldown starts (0 while locked).
    pub attempts_remaining: u32,
    /// Time until verification is accepted again, if locked.
    pub locked_for: Option<Duration>,
}

/// Counts consecutive failures and enforces the cooldown.
///
/// Takes explicit instants so callers control the clock.
#[derive(Debug, Clone)]
pub struct AttemptTracker {
    policy: LockoutPolicy,
    failures: u32,
    locked_until: Option<Instant>,
}

impl AttemptTracker {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            failures: 0,
            locked_until: None,
        }
    }

    /// Fail with `LockedOut` while the cooldown is running.
    ///
    /// Once it has elapsed the counter starts over.
    pub fn check(&mut self, now: Instant) -> Result<()> {
        if let Some(until) = self.locked_until {
            if now < until {
                return Err(VaultError::LockedOut {
                    retry_after_secs: ceil_secs(until - now),
                });
            }
            self.reset();
        }
        Ok(())
    }

    /// Count a failed attempt, starting the cooldown at the limit.
    pub fn record_failure(&mut self, now: Instant) {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.policy.max_attempts {
            let until = now
                .checked_add(self.policy.cooldown)
                .unwrap_or(now + MAX_LOCKOUT_COOLDOWN);
            self.locked_until = Some(until);
        }
    }

    /// A correct PIN clears the counter.
    pub fn record_success(&mut self) {
        self.reset();
    }

    /// Current state, counting failures already recorded.
    pub fn status(&self, now: Instant) -> LockoutStatus {
        match self.locked_until {
            Some(until) if now < until => LockoutStatus {
                attempts_remaining: 0,
                locked_for: Some(until - now),
            },
            Some(_) => LockoutStatus {
                attempts_remaining: self.policy.max_attempts,
                locked_for: None,
            },
            None => LockoutStatus {
                attempts_remaining: self.policy.max_attempts.saturating_sub(self.failures),
                locked_for: None,
            },
        }
    }

    fn reset(&mut self) {
        self.failures = 0;
        self.locked_until = None;
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Salt, PIN hash, and KDF parameters, loaded together.
struct Credentials {
    salt: Vec<u8>,
    pin_hash: String,
    kdf: KdfParams,
}

/// Owns the salt / PIN hash records and the attempt counter.
pub struct PinVerifier {
    store: Arc<dyn SecureKeyValueStore>,
    config: VaultConfig,
    credentials_lock: Mutex<()>,
    attempts: Mutex<AttemptTracker>,
}

impl PinVerifier {
    /// Build a verifier over `store`, validating `config` first.
    pub fn new(store: Arc<dyn SecureKeyValueStore>, config: VaultConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            credentials_lock: Mutex::new(()),
            attempts: Mutex::new(AttemptTracker::new(config.lockout)),
        })
    }

    /// Whether a PIN has been set.
    pub async fn status(&self) -> Result<VaultStatus> {
        let _guard = self.credentials_lock.lock().await;
        Ok(match self.read_credentials().await? {
            Some(_) => VaultStatus::Initialized,
            None => VaultStatus::NotInitialized,
        })
    }

    /// Set the PIN for a new vault.
    ///
    /// Fails with `AlreadyInitialized` rather than overwriting, since a new
    /// salt would orphan every existing entry.
    pub async fn initialize(&self, pin: &str) -> Result<()> {
        self.config.pin_policy.check(pin)?;

        let _guard = self.credentials_lock.lock().await;
        if self.read_credentials().await?.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }

        let salt = generate_salt(self.config.salt_len)?;
        let kdf = self.config.kdf;
        let pin_hash = derive_pin_key(pin, salt.clone(), kdf).await?.pin_hash()?;

        let kdf_record = serde_json::to_vec(&kdf)
            .map_err(|e| VaultError::Corrupted(format!("cannot serialize {KDF_PARAMS_KEY}: {e}")))?;

        // The PIN hash goes last: its presence marks the pair complete.
        self.store.set(KDF_PARAMS_KEY, &kdf_record).await?;
        self.store
            .set(SALT_KEY, encoding::encode(&salt).as_bytes())
            .await?;
        self.store.set(PIN_HASH_KEY, pin_hash.as_bytes()).await?;

        info!(salt_len = salt.len(), "Vault initialized");
        Ok(())
    }

    /// Check `pin` against the stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; fails with `NotInitialized` before
    /// `initialize` and with `LockedOut` during the cooldown.
    pub async fn verify_pin(&self, pin: &str) -> Result<bool> {
        Ok(self.attempt(pin).await?.is_some())
    }

    /// Verify `pin` and hand back the derived PIN key.
    ///
    /// Counts toward the lockout exactly like `verify_pin`; a wrong PIN
    /// fails with `AuthenticationFailed`.
    pub async fn unlock(&self, pin: &str) -> Result<SymmetricKey> {
        self.attempt(pin)
            .await?
            .ok_or(VaultError::AuthenticationFailed)
    }

    /// Snapshot of the failed-attempt counter.
    pub async fn lockout_status(&self) -> LockoutStatus {
        self.attempts.lock().await.status(Instant::now())
    }

    /// One serialized verification attempt.
    ///
    /// The tracker stays locked for the whole sequence, so concurrent
    /// calls cannot all pass `check` before any failure is recorded.
    async fn attempt(&self, pin: &str) -> Result<Option<SymmetricKey>> {
        let mut attempts = self.attempts.lock().await;
        attempts.check(Instant::now())?;

        let credentials = {
            let _guard = self.credentials_lock.lock().await;
            self.read_credentials().await?
        }
        .ok_or(VaultError::NotInitialized)?;

        // A PIN the policy would never have accepted cannot match.
        if !self.config.pin_policy.accepts(pin) {
            Self::record_failure(&mut attempts);
            return Ok(None);
        }

        let pin_key = derive_pin_key(pin, credentials.salt, credentials.kdf).await?;
        let actual = pin_key.pin_hash()?;

        if verify_pin_hash(&actual, &credentials.pin_hash) {
            attempts.record_success();
            debug!("PIN verified");
            Ok(Some(pin_key))
        } else {
            Self::record_failure(&mut attempts);
            Ok(None)
        }
    }

    fn record_failure(attempts: &mut AttemptTracker) {
        let now = Instant::now();
        attempts.record_failure(now);
        let status = attempts.status(now);
        match status.locked_for {
            Some(cooldown) => warn!(
                cooldown_secs = cooldown.as_secs(),
                "Too many failed PIN attempts; verification locked"
            ),
            None => warn!(
                attempts_remaining = status.attempts_remaining,
                "PIN verification failed"
            ),
        }
    }

    /// Load the credential records.  Callers hold `credentials_lock`.
    async fn read_credentials(&self) -> Result<Option<Credentials>> {
        let salt = self.store.get(SALT_KEY).await?;
        let pin_hash = self.store.get(PIN_HASH_KEY).await?;

        let (salt, pin_hash) = match (salt, pin_hash) {
            (Some(salt), Some(pin_hash)) => (salt, pin_hash),
            (None, None) => return Ok(None),
            _ => {
                warn!("Found an incomplete salt / PIN hash pair; treating the vault as not initialized");
                return Ok(None);
            }
        };

        let salt = encoding::decode(SALT_KEY, &record_text(SALT_KEY, salt)?)?;
        if salt.len() < MIN_SALT_LEN {
            return Err(VaultError::Corrupted(format!(
                "{SALT_KEY} is {} bytes, expected at least {MIN_SALT_LEN}",
                salt.len()
            )));
        }
        let pin_hash = record_text(PIN_HASH_KEY, pin_hash)?.trim().to_string();

        let kdf = match self.store.get(KDF_PARAMS_KEY).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| VaultError::Corrupted(format!("{KDF_PARAMS_KEY}: {e}")))?,
            None => self.config.kdf,
        };

        Ok(Some(Credentials {
            salt,
            pin_hash,
            kdf,
        }))
    }
}

fn record_text(key: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| VaultError::Corrupted(format!("{key} is not valid UTF-8")))
}

/// Run Argon2id on the blocking pool; it is deliberately slow.
async fn derive_pin_key(pin: &str, salt: Vec<u8>, kdf: KdfParams) -> Result<SymmetricKey> {
    let pin = Zeroizing::new(pin.to_owned());
    tokio::task::spawn_blocking(move || derive_key(&pin, &salt, &kdf))
        .await
        .map_err(|e| VaultError::Crypto(format!("key derivation task failed: {e}")))?
}
