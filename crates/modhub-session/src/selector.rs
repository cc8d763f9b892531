//! Which identity outgoing requests act as.

use serde::{Deserialize, Serialize};

/// Sentinel accepted in place of a team id to mean "act as myself".
pub const NO_TEAM: &str = "none";

/// Active-identity selector.
///
/// `Team` is only valid while the team is present in the current identity's
/// memberships; the manager enforces that on every identity change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ActiveIdentity {
    #[default]
    Personal,
    Team { team_id: String },
}

impl ActiveIdentity {
    /// Interpret a user-supplied team id. `None`, `""` and `"none"` select
    /// the personal identity.
    #[must_use]
    pub fn from_request(team_id: Option<&str>) -> Self {
        match team_id.map(str::trim) {
            None | Some("" | NO_TEAM) => Self::Personal,
            Some(team_id) => Self::Team {
                team_id: team_id.to_string(),
            },
        }
    }

    /// Rebuild the selector from the cached `asTeam` and `activeTeamId`
    /// values.
    #[must_use]
    pub fn from_cache(as_team: Option<&str>, active_team_id: Option<&str>) -> Self {
        if as_team.map(str::trim) != Some("true") {
            return Self::Personal;
        }
        Self::from_request(active_team_id)
    }

    #[must_use]
    pub fn team_id(&self) -> Option<&str> {
        match self {
            Self::Personal => None,
            Self::Team { team_id } => Some(team_id),
        }
    }

    #[must_use]
    pub const fn is_team(&self) -> bool {
        matches!(self, Self::Team { .. })
    }
}
