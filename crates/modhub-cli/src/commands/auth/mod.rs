mod login;
mod logout;
mod status;
mod switch;
mod teams;

use modhub_config::HubConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `modhub auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    flags: &GlobalFlags,
    config: &HubConfig,
) -> anyhow::Result<()> {
    let mut session = bootstrap::open_session(config, flags)?;
    match action {
        AuthCommands::Login(args) => login::handle(args, flags, &mut session).await,
        AuthCommands::Logout => logout::handle(flags, &mut session),
        AuthCommands::Status(args) => status::handle(args, flags, &mut session).await,
        AuthCommands::Switch(args) => switch::handle(args, flags, &mut session).await,
        AuthCommands::Teams => teams::handle(flags, &mut session).await,
    }
}
