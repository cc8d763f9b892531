//! Remote identity service contract.

use std::future::Future;

use modhub_core::{ApiError, Credential, Identity, TeamMembership};

/// The site's identity endpoints.
///
/// Implemented over HTTP by [`crate::HttpIdentityService`]; tests script
/// their own implementation.
pub trait IdentityService: Send + Sync {
    /// "Who am I": resolve the identity behind the current session.
    ///
    /// Any non-success answer (including "no session") is an `Err` whose
    /// kind is not [`ApiError::Network`].
    fn who_am_i(&self) -> impl Future<Output = Result<Identity, ApiError>> + Send;

    /// Issue a personal bearer token. `Ok(None)` when the site has none to give.
    fn issue_personal_token(
        &self,
    ) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;

    /// Issue a token scoped to `team_id`.
    fn issue_team_token(
        &self,
        team_id: &str,
        personal: Option<&Credential>,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// URL the user should visit to log in.
    fn login_redirect_url(&self) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// Teams the credential's owner belongs to.
    fn list_teams(
        &self,
        credential: Option<&Credential>,
    ) -> impl Future<Output = Result<Vec<TeamMembership>, ApiError>> + Send;
}
