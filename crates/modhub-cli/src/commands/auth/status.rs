use modhub_session::SessionPhase;
use serde::Serialize;

use crate::bootstrap::Session;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthStatusArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    phase: SessionPhase,
    user_id: Option<String>,
    display_name: Option<String>,
    roles: Option<u8>,
    banned: bool,
    acting_as: Option<String>,
    has_credential: bool,
    teams: Vec<TeamSummary>,
    login_url: Option<String>,
}

#[derive(Serialize)]
struct TeamSummary {
    team_id: String,
    team_name: String,
    title: &'static str,
}

pub async fn handle(
    args: &AuthStatusArgs,
    flags: &GlobalFlags,
    session: &mut Session,
) -> anyhow::Result<()> {
    let phase = session.initialize(args.refresh).await;
    let identity = session.identity();

    let status = AuthStatusResponse {
        phase,
        user_id: identity.map(|i| i.user_id.clone()),
        display_name: identity.map(|i| i.display_name.clone()),
        roles: identity.map(|i| i.roles.bits()),
        banned: identity.is_some_and(|i| i.banned),
        acting_as: session.selector().team_id().map(ToString::to_string),
        has_credential: session.active_credential().is_some(),
        teams: identity
            .map(|i| {
                i.teams
                    .iter()
                    .map(|team| TeamSummary {
                        team_id: team.team_id.clone(),
                        team_name: team.team_name.clone(),
                        title: team.roles.highest_title(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        login_url: if phase == SessionPhase::LoginRequired {
            session.login_redirect_url().map(ToString::to_string)
        } else {
            None
        },
    };

    output(&status, flags.format)
}
