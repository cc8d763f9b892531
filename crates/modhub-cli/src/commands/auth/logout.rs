use serde::Serialize;

use crate::bootstrap::Session;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

pub fn handle(flags: &GlobalFlags, session: &mut Session) -> anyhow::Result<()> {
    session.logout();
    output(&AuthLogoutResponse { cleared: true }, flags.format)
}
