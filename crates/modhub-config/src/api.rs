//! Remote site configuration.

use std::time::Duration;

use modhub_core::http::ClientOptions;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_base_url() -> String {
    String::from("http://localhost:8000")
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("modhub/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Site root; every endpoint path is joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout, enforced by the HTTP client.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Session cookie (`name=value`) copied from a browser login.
    /// Seeds the client's cookie jar; empty means no session.
    #[serde(default)]
    pub session_cookie: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            session_cookie: String::new(),
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    #[must_use]
    pub fn has_session_cookie(&self) -> bool {
        !self.session_cookie.is_empty()
    }

    /// Options for [`modhub_core::http::build_client`].
    #[must_use]
    pub fn client_options(&self) -> ClientOptions<'_> {
        ClientOptions {
            base_url: self.base(),
            user_agent: &self.user_agent,
            timeout: Duration::from_secs(self.timeout_secs),
            session_cookie: self.has_session_cookie().then_some(self.session_cookie.as_str()),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base();
        if base.is_empty() {
            return Err(ConfigError::invalid("api.base_url", "must not be empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api.base_url",
                "must start with http:// or https://",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("api.timeout_secs", "must be positive"));
        }
        Ok(())
    }
}
