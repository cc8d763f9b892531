//! Session state as seen by subscribers.

use modhub_core::Identity;
use serde::Serialize;

use crate::selector::ActiveIdentity;

/// Identity-dimension phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Anonymous,
    Resolving,
    Authenticated,
    LoginRequired,
}

/// What is known about the session owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Resolution {
    /// Not asked yet, or the last attempt never got an answer.
    #[default]
    Unresolved,
    Authenticated(Identity),
    /// The site answered and there is no session.
    LoggedOut,
}

impl Resolution {
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unresolved | Self::LoggedOut => None,
        }
    }
}

/// Settled session state handed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub identity: Option<Identity>,
    pub acting_as: ActiveIdentity,
    /// Whether a request sent now would carry a credential.
    pub has_credential: bool,
}

/// Receives a snapshot after every settled transition.
pub trait SessionObserver: Send {
    fn session_changed(&self, snapshot: &SessionSnapshot);
}

impl<F> SessionObserver for F
where
    F: Fn(&SessionSnapshot) + Send,
{
    fn session_changed(&self, snapshot: &SessionSnapshot) {
        self(snapshot);
    }
}
