//! # modhub-config
//!
//! Layered configuration loading for modhub using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MODHUB_*` prefix, `__` as separator)
//! 2. Project-level `.modhub/config.toml`
//! 3. User-level `~/.config/modhub/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `MODHUB_API__BASE_URL` -> `api.base_url`,
//! `MODHUB_SEARCH__PAGE_SIZE` -> `search.page_size`, etc.
//!
//! ```no_run
//! use modhub_config::HubConfig;
//!
//! let config = HubConfig::load_with_dotenv().expect("config");
//! println!("site: {}", config.api.base_url);
//! ```

mod api;
mod cache;
mod error;
mod search;

pub use api::ApiConfig;
pub use cache::CacheConfig;
pub use error::ConfigError;
pub use search::SearchConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HubConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl HubConfig {
    /// Load configuration from TOML files and environment variables, then validate.
    ///
    /// Does NOT call `dotenvy`; use [`load_with_dotenv`](Self::load_with_dotenv)
    /// for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load `.env` from the current directory first, then [`load`](Self::load).
    ///
    /// A missing `.env` is fine; values already in the environment win.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Dotenv`] if a `.env` exists but cannot be read or
    /// parsed, otherwise the same as [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(error) if error.not_found() => {}
            Err(error) => return Err(ConfigError::Dotenv(error)),
        }
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".modhub/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("MODHUB_").split("__"))
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.search.validate()?;
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("modhub").join("config.toml"))
    }
}
