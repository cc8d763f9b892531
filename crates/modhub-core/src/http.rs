//! Shared HTTP helpers for the site's API clients.
//!
//! Centralizes client construction (timeout, user agent, cookie jar),
//! credential attachment and status-code mapping so the identity and search
//! clients stay focused on request construction and response mapping.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::cookie::Jar;

use crate::credential::Credential;
use crate::errors::ApiError;

/// Settings for [`build_client`].
#[derive(Debug, Clone)]
pub struct ClientOptions<'a> {
    pub base_url: &'a str,
    pub user_agent: &'a str,
    pub timeout: Duration,
    /// `name=value` cookie seeded into the jar for `base_url`.
    pub session_cookie: Option<&'a str>,
}

/// Build a `reqwest::Client` with a cookie store scoped to the site.
///
/// # Errors
///
/// Returns [`ApiError::Network`] if the base URL does not parse or the
/// client cannot be built.
pub fn build_client(options: &ClientOptions<'_>) -> Result<reqwest::Client, ApiError> {
    let jar = Arc::new(Jar::default());
    if let Some(cookie) = options.session_cookie.filter(|c| !c.is_empty()) {
        let url = Url::parse(options.base_url)
            .map_err(|e| ApiError::Network(format!("invalid base URL: {e}")))?;
        jar.add_cookie_str(cookie, &url);
    }

    reqwest::Client::builder()
        .user_agent(options.user_agent)
        .timeout(options.timeout)
        .cookie_provider(jar)
        .build()
        .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))
}

/// Join an endpoint path and query pairs onto the base URL.
///
/// # Errors
///
/// Returns [`ApiError::Network`] if the resulting URL does not parse.
pub fn endpoint(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
    let raw = format!("{}{path}", base.trim_end_matches('/'));
    let parsed = if params.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, params)
    };
    parsed.map_err(|e| ApiError::Network(format!("invalid URL {raw}: {e}")))
}

/// Attach the credential as the raw `Authorization` value.
///
/// No credential means an unauthenticated request, not an error.
#[must_use]
pub fn authorize(
    request: reqwest::RequestBuilder,
    credential: Option<&Credential>,
) -> reqwest::RequestBuilder {
    match credential {
        Some(credential) => request.header(reqwest::header::AUTHORIZATION, credential.token()),
        None => request,
    }
}

/// Map a transport failure (no response) to [`ApiError::Network`].
#[must_use]
pub fn transport_error(context: &str, error: &reqwest::Error) -> ApiError {
    ApiError::Network(format!("{context}: {error}"))
}

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success; otherwise the status and
/// body are mapped through [`ApiError::from_status`].
///
/// # Errors
///
/// Returns the mapped [`ApiError`] for any non-2xx status.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), body = %body, "API call failed");
    Err(ApiError::from_status(status.as_u16(), body))
}
