use modhub_session::SessionPhase;
use serde::Serialize;

use crate::bootstrap::Session;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    login_url: Option<String>,
    browser_opened: bool,
    note: Option<String>,
}

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    session: &mut Session,
) -> anyhow::Result<()> {
    let phase = session.initialize(true).await;
    if phase == SessionPhase::Authenticated {
        return output(
            &AuthLoginResponse {
                authenticated: true,
                login_url: None,
                browser_opened: false,
                note: Some("already logged in".into()),
            },
            flags.format,
        );
    }

    let url = session
        .login_redirect_url()
        .map(ToString::to_string)
        .ok_or_else(|| anyhow::anyhow!("auth login: the site did not provide a login URL"))?;

    let browser_opened = if args.no_browser {
        false
    } else {
        match open::that(&url) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "failed to open browser");
                false
            }
        }
    };

    output(
        &AuthLoginResponse {
            authenticated: false,
            login_url: Some(url),
            browser_opened,
            note: Some(
                "after logging in, copy the session cookie into MODHUB_API__SESSION_COOKIE".into(),
            ),
        },
        flags.format,
    )
}
