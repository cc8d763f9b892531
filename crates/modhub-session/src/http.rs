//! HTTP implementation of [`IdentityService`].
//!
//! Endpoints (relative to `api.base_url`):
//! - `GET /public_api/me`: who am I (204 or 401 when there is no session)
//! - `GET /token`: personal token as a text body, `null` when none
//! - `GET /public_api/teams/token?team_id=`: team token as a text body
//! - `GET /oauth2_url`: `{ "url": ... }`
//! - `GET /public_api/teams`: memberships of the credential's owner

use modhub_config::ApiConfig;
use modhub_core::http::{authorize, build_client, check_response, endpoint, transport_error};
use modhub_core::roles::from_wire;
use modhub_core::{ApiError, Credential, Identity, TeamMembership};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::service::IdentityService;

/// Body the token endpoint sends for a banned account, with a 200 status.
const BANNED_BODY: &str = "Account has been banned.";

pub struct HttpIdentityService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityService {
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client(&config.client_options())?,
            base_url: config.base().to_string(),
        })
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
        credential: Option<&Credential>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = endpoint(&self.base_url, path, params)?;
        tracing::debug!(%url, authorized = credential.is_some(), "identity request");
        let resp = authorize(self.client.get(url), credential)
            .send()
            .await
            .map_err(|e| transport_error(path, &e))?;
        check_response(resp).await
    }
}

impl IdentityService for HttpIdentityService {
    async fn who_am_i(&self) -> Result<Identity, ApiError> {
        let resp = self.get("/public_api/me", &[], None).await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Err(ApiError::Unauthenticated);
        }
        let me: MeResponse = decode_json(resp).await?;
        Ok(me.into_identity())
    }

    async fn issue_personal_token(&self) -> Result<Option<String>, ApiError> {
        let resp = self.get("/token", &[], None).await?;
        parse_token_body(&read_text(resp).await?)
    }

    async fn issue_team_token(
        &self,
        team_id: &str,
        personal: Option<&Credential>,
    ) -> Result<String, ApiError> {
        let resp = self
            .get("/public_api/teams/token", &[("team_id", team_id)], personal)
            .await?;
        parse_token_body(&read_text(resp).await?)?
            .ok_or_else(|| ApiError::Decode(format!("empty token for team {team_id}")))
    }

    async fn login_redirect_url(&self) -> Result<String, ApiError> {
        let resp = self.get("/oauth2_url", &[], None).await?;
        let body: LoginUrlResponse = decode_json(resp).await?;
        Ok(body.url)
    }

    async fn list_teams(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<TeamMembership>, ApiError> {
        let resp = self.get("/public_api/teams", &[], credential).await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let teams: Vec<TeamRecord> = decode_json(resp).await?;
        Ok(teams.into_iter().map(TeamRecord::into_membership).collect())
    }
}

async fn read_text(resp: reqwest::Response) -> Result<String, ApiError> {
    resp.text()
        .await
        .map_err(|e| ApiError::Decode(format!("failed to read body: {e}")))
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ApiError> {
    let body = read_text(resp).await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Interpret a text token body: `null` or empty means no token.
fn parse_token_body(body: &str) -> Result<Option<String>, ApiError> {
    let body = body.trim();
    if body == BANNED_BODY {
        return Err(ApiError::Forbidden);
    }
    if body.is_empty() || body == "null" {
        return Ok(None);
    }
    Ok(Some(body.trim_matches('"').to_string()))
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Ids arrive as JSON numbers from some endpoints and strings from others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    roles: u64,
    user_id_string: String,
    #[serde(default)]
    is_banned: bool,
    discord: DiscordUser,
    #[serde(default)]
    teams: Vec<TeamRecord>,
}

#[derive(Debug, Deserialize)]
struct DiscordUser {
    username: String,
}

#[derive(Debug, Deserialize)]
struct TeamRecord {
    id: RawId,
    name: String,
    #[serde(default)]
    roles: u64,
}

#[derive(Debug, Deserialize)]
struct LoginUrlResponse {
    url: String,
}

impl MeResponse {
    fn into_identity(self) -> Identity {
        Identity {
            user_id: self.user_id_string,
            display_name: self.discord.username,
            roles: from_wire(self.roles),
            banned: self.is_banned,
            teams: self
                .teams
                .into_iter()
                .map(TeamRecord::into_membership)
                .collect(),
        }
    }
}

impl TeamRecord {
    fn into_membership(self) -> TeamMembership {
        TeamMembership {
            team_id: self.id.into_string(),
            team_name: self.name,
            roles: from_wire(self.roles),
        }
    }
}
