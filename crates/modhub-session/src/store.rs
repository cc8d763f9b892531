//! Persistent key-value cache for session state.
//!
//! Every logical key is stored and replaced on its own, so a crash can
//! never leave a half-written composite record. [`FileStore`] keeps one
//! file per key (written through a temp file + rename); [`MemoryStore`]
//! backs tests and `--ephemeral` runs. Bearer tokens go through
//! [`KeyringStore`](crate::keyring_store::KeyringStore) first.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Logical cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CacheKey {
    Identity,
    LoggedIn,
    LoginRedirectUrl,
    PersonalToken,
    TeamToken,
    ActiveTeamId,
    AsTeam,
}

impl CacheKey {
    pub const ALL: [Self; 7] = [
        Self::Identity,
        Self::LoggedIn,
        Self::LoginRedirectUrl,
        Self::PersonalToken,
        Self::TeamToken,
        Self::ActiveTeamId,
        Self::AsTeam,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::LoggedIn => "loggedIn",
            Self::LoginRedirectUrl => "loginRedirectUrl",
            Self::PersonalToken => "personalToken",
            Self::TeamToken => "teamToken",
            Self::ActiveTeamId => "activeTeamId",
            Self::AsTeam => "asTeam",
        }
    }

    /// Keys holding bearer tokens.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::PersonalToken | Self::TeamToken)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache key '{key}': {source}")]
    Io {
        key: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("cache key '{key}' holds malformed JSON: {source}")]
    Json {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache directory unavailable: {0}")]
    Unavailable(String),
}

/// Durable string storage addressed by [`CacheKey`].
pub trait KeyValueStore: Send {
    /// Read a key. `Ok(None)` when it was never written or was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError>;

    /// Replace a key's value atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the value cannot be written.
    fn set(&mut self, key: CacheKey, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be modified.
    fn remove(&mut self, key: CacheKey) -> Result<(), StoreError>;

    /// Read and decode a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if the stored value does not decode.
    fn get_json<T: DeserializeOwned>(&self, key: CacheKey) -> Result<Option<T>, StoreError>
    where
        Self: Sized,
    {
        self.get(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                    key: key.as_str(),
                    source,
                })
            })
            .transpose()
    }

    /// Encode and write a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or writing fails.
    fn set_json<T: Serialize>(&mut self, key: CacheKey, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Json {
            key: key.as_str(),
            source,
        })?;
        self.set(key, &raw)
    }
}

impl KeyValueStore for Box<dyn KeyValueStore> {
    fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: CacheKey, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: CacheKey) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<CacheKey, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys currently holding a value.
    #[must_use]
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.keys().copied().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(&key).cloned())
    }

    fn set(&mut self, key: CacheKey, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: CacheKey) -> Result<(), StoreError> {
        self.entries.remove(&key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One file per key under a private directory (0700, files 0600 on Unix).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Unavailable(format!("mkdir {}: {e}", dir.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&dir, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", dir.display());
            }
        }
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: CacheKey) -> PathBuf {
        self.dir.join(key.as_str())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.as_str(),
                source,
            }),
        }
    }

    fn set(&mut self, key: CacheKey, value: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            key: key.as_str(),
            source,
        };
        let mut staging = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        staging.write_all(value.as_bytes()).map_err(io_err)?;
        staging.as_file().sync_all().map_err(io_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(staging.path(), fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }
        staging
            .persist(self.path(key))
            .map(drop)
            .map_err(|e| io_err(e.error))
    }

    fn remove(&mut self, key: CacheKey) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.as_str(),
                source,
            }),
        }
    }
}
