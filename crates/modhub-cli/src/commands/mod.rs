pub mod auth;
pub mod search;

use modhub_config::HubConfig;

use crate::cli::{Commands, GlobalFlags};

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    flags: &GlobalFlags,
    config: &HubConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => auth::handle(&action, flags, config).await,
        Commands::Search(args) => search::handle(&args, flags, config).await,
    }
}
