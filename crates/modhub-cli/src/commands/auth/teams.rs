use modhub_core::TeamMembership;
use serde::Serialize;

use crate::bootstrap::Session;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct TeamRow {
    team_id: String,
    team_name: String,
    title: &'static str,
    roles: u8,
}

impl From<TeamMembership> for TeamRow {
    fn from(team: TeamMembership) -> Self {
        Self {
            title: team.roles.highest_title(),
            roles: team.roles.bits(),
            team_id: team.team_id,
            team_name: team.team_name,
        }
    }
}

pub async fn handle(flags: &GlobalFlags, session: &mut Session) -> anyhow::Result<()> {
    session.initialize(false).await;
    let teams = session.fetch_teams().await?;
    let rows: Vec<TeamRow> = teams.into_iter().map(TeamRow::from).collect();
    output(&rows, flags.format)
}
