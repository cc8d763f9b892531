use clap::Subcommand;

use crate::cli::subcommands::{AuthCommands, SearchArgs};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Session, login and team identity.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Search the mod listing.
    Search(SearchArgs),
}
