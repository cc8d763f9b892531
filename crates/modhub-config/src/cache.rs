//! Persistent session cache location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Directory holding one file per cache key. Empty means `~/.modhub/session`.
    #[serde(default)]
    pub dir: String,

    /// Keep session state in memory only.
    #[serde(default)]
    pub ephemeral: bool,
}

impl CacheConfig {
    /// Resolved cache directory, `None` if no home directory can be found.
    #[must_use]
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        if self.dir.is_empty() {
            dirs::home_dir().map(|home| home.join(".modhub").join("session"))
        } else {
            Some(PathBuf::from(&self.dir))
        }
    }
}
