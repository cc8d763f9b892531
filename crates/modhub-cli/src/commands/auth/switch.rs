use modhub_core::CredentialScope;
use modhub_session::SessionPhase;
use serde::Serialize;

use crate::bootstrap::Session;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthSwitchArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthSwitchResponse {
    acting_as: Option<String>,
    credential: Option<&'static str>,
}

pub async fn handle(
    args: &AuthSwitchArgs,
    flags: &GlobalFlags,
    session: &mut Session,
) -> anyhow::Result<()> {
    if session.initialize(false).await != SessionPhase::Authenticated {
        anyhow::bail!("auth switch: not logged in. Run 'modhub auth login' first.");
    }
    session.switch_identity(Some(args.team.as_str())).await?;

    let credential = session.active_credential().map(|c| match c.scope() {
        CredentialScope::Personal => "personal",
        CredentialScope::Team(_) => "team",
    });
    output(
        &AuthSwitchResponse {
            acting_as: session.selector().team_id().map(ToString::to_string),
            credential,
        },
        flags.format,
    )
}
