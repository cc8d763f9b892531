use clap::{Args, Subcommand};

/// Session and identity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Print the login URL and open it in the browser.
    Login(AuthLoginArgs),
    /// Clear every cached session value.
    Logout,
    /// Show who the session belongs to and which identity is active.
    Status(AuthStatusArgs),
    /// Act as a team, or as yourself with `none`.
    Switch(AuthSwitchArgs),
    /// List the teams you belong to.
    Teams,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Only print the URL, do not launch a browser.
    #[arg(long)]
    pub no_browser: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AuthStatusArgs {
    /// Ask the site again instead of trusting the cached identity.
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AuthSwitchArgs {
    /// Team id to act as, or `none`.
    pub team: String,
}
