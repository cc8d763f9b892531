use anyhow::Context;
use modhub_config::HubConfig;
use modhub_session::{
    FileStore, HttpIdentityService, KeyValueStore, KeyringStore, MemoryStore, OsKeyring,
    SessionManager,
};

use crate::cli::GlobalFlags;

pub type Session = SessionManager<HttpIdentityService, Box<dyn KeyValueStore>>;

/// Load `.env` from the working directory, then the layered configuration.
pub fn load_config() -> anyhow::Result<HubConfig> {
    HubConfig::load_with_dotenv().context("failed to load modhub configuration")
}

/// Build the session manager over the configured cache.
pub fn open_session(config: &HubConfig, flags: &GlobalFlags) -> anyhow::Result<Session> {
    let store: Box<dyn KeyValueStore> = if flags.ephemeral || config.cache.ephemeral {
        tracing::debug!("using in-memory session cache");
        Box::new(MemoryStore::new())
    } else {
        let dir = config
            .cache
            .resolve_dir()
            .context("cannot locate a home directory; set MODHUB_CACHE__DIR")?;
        let files = FileStore::open(&dir)
            .with_context(|| format!("failed to open session cache at {}", dir.display()))?;
        let keychain = OsKeyring::from_env();
        tracing::debug!(service = keychain.service(), "bearer tokens kept in the OS keychain");
        Box::new(KeyringStore::new(keychain, files))
    };
    let service =
        HttpIdentityService::new(&config.api).context("failed to build identity client")?;
    Ok(SessionManager::new(service, store))
}
