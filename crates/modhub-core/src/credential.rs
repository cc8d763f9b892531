//! Scoped bearer credentials.
//!
//! A credential is opaque: there is no client-verifiable expiry, the server
//! decides validity when it is used.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who a credential acts for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "team_id", rename_all = "snake_case")]
pub enum CredentialScope {
    Personal,
    Team(String),
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    scope: CredentialScope,
    token: String,
}

impl Credential {
    #[must_use]
    pub fn personal(token: impl Into<String>) -> Self {
        Self {
            scope: CredentialScope::Personal,
            token: token.into(),
        }
    }

    #[must_use]
    pub fn team(team_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            scope: CredentialScope::Team(team_id.into()),
            token: token.into(),
        }
    }

    #[must_use]
    pub const fn scope(&self) -> &CredentialScope {
        &self.scope
    }

    /// Team id for team-scoped credentials.
    #[must_use]
    pub fn team_id(&self) -> Option<&str> {
        match &self.scope {
            CredentialScope::Personal => None,
            CredentialScope::Team(team_id) => Some(team_id),
        }
    }

    /// Raw bearer value, for the `Authorization` header only.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("scope", &self.scope)
            .field("token", &"<redacted>")
            .finish()
    }
}
