//! OS keychain tier for bearer tokens.
//!
//! [`KeyringStore`] sends [`CacheKey::is_secret`] keys to a [`SecretBackend`]
//! and everything else to a [`FileStore`]. When the keychain is unavailable
//! a token falls back to the file store (0600).

use crate::store::{CacheKey, FileStore, KeyValueStore, StoreError};

const DEFAULT_KEYRING_SERVICE: &str = "modhub-cli";

/// Keyring service name.
///
/// Defaults to `"modhub-cli"`. Override via `MODHUB_KEYRING_SERVICE` (e.g.
/// `"modhub-cli-test"`) to keep test runs away from real credentials.
#[must_use]
pub fn keyring_service() -> String {
    std::env::var("MODHUB_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Secret storage addressed by cache key.
pub trait SecretBackend: Send {
    /// # Errors
    ///
    /// [`keyring::Error::NoEntry`] when nothing is stored.
    fn read(&self, key: CacheKey) -> keyring::Result<String>;

    /// # Errors
    ///
    /// Any platform failure writing the secret.
    fn write(&mut self, key: CacheKey, value: &str) -> keyring::Result<()>;

    /// # Errors
    ///
    /// [`keyring::Error::NoEntry`] when nothing was stored.
    fn delete(&mut self, key: CacheKey) -> keyring::Result<()>;
}

/// The platform keychain, one entry per key under a service name.
#[derive(Debug, Clone)]
pub struct OsKeyring {
    service: String,
}

impl OsKeyring {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Use [`keyring_service`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(keyring_service())
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: CacheKey) -> keyring::Result<keyring::Entry> {
        keyring::Entry::new(&self.service, key.as_str())
    }
}

impl SecretBackend for OsKeyring {
    fn read(&self, key: CacheKey) -> keyring::Result<String> {
        self.entry(key)?.get_password()
    }

    fn write(&mut self, key: CacheKey, value: &str) -> keyring::Result<()> {
        self.entry(key)?.set_password(value)
    }

    fn delete(&mut self, key: CacheKey) -> keyring::Result<()> {
        self.entry(key)?.delete_credential()
    }
}

/// Keychain for tokens, files for the rest.
#[derive(Debug)]
pub struct KeyringStore<B = OsKeyring> {
    secrets: B,
    fallback: FileStore,
}

impl<B: SecretBackend> KeyringStore<B> {
    pub const fn new(secrets: B, fallback: FileStore) -> Self {
        Self { secrets, fallback }
    }

    pub const fn secrets(&self) -> &B {
        &self.secrets
    }

    pub const fn fallback(&self) -> &FileStore {
        &self.fallback
    }
}

impl<B: SecretBackend> KeyValueStore for KeyringStore<B> {
    fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError> {
        if !key.is_secret() {
            return self.fallback.get(key);
        }
        match self.secrets.read(key) {
            Ok(token) if !token.is_empty() => Ok(Some(token)),
            Ok(_) | Err(keyring::Error::NoEntry) => self.fallback.get(key),
            Err(error) => {
                tracing::warn!(%error, key = key.as_str(), "keyring read failed; trying file");
                self.fallback.get(key)
            }
        }
    }

    fn set(&mut self, key: CacheKey, value: &str) -> Result<(), StoreError> {
        if !key.is_secret() {
            return self.fallback.set(key, value);
        }
        match self.secrets.write(key, value) {
            // A plaintext copy from an earlier fallback must not outlive the keychain entry.
            Ok(()) => self.fallback.remove(key),
            Err(error) => {
                tracing::warn!(%error, key = key.as_str(), "keyring store failed; falling back to file");
                self.fallback.set(key, value)
            }
        }
    }

    fn remove(&mut self, key: CacheKey) -> Result<(), StoreError> {
        if key.is_secret() {
            match self.secrets.delete(key) {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(error) => {
                    tracing::warn!(%error, key = key.as_str(), "keyring delete failed");
                }
            }
        }
        self.fallback.remove(key)
    }
}
