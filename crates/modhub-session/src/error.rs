use modhub_core::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not authenticated: run `modhub auth login` first")]
    NotAuthenticated,

    #[error("not a member of team {0}")]
    UnknownTeam(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
