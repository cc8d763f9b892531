use serde::{Deserialize, Serialize};

use crate::roles::{RoleMask, TeamRoleMask, flag_bits, has_role};

/// Authenticated user record resolved from the site's "who am I" endpoint.
///
/// Replaced wholesale on refresh, never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
    #[serde(with = "flag_bits")]
    pub roles: RoleMask,
    /// Banned accounts still resolve but every authorized call is rejected.
    #[serde(default)]
    pub banned: bool,
    #[serde(default)]
    pub teams: Vec<TeamMembership>,
}

/// One team the identity belongs to, with the roles held inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub team_id: String,
    pub team_name: String,
    #[serde(with = "flag_bits")]
    pub roles: TeamRoleMask,
}

impl Identity {
    #[must_use]
    pub fn has_role(&self, role: RoleMask) -> bool {
        has_role(self.roles, role)
    }

    /// Look up a membership by team id.
    #[must_use]
    pub fn team(&self, team_id: &str) -> Option<&TeamMembership> {
        self.teams.iter().find(|team| team.team_id == team_id)
    }

    #[must_use]
    pub fn is_member_of(&self, team_id: &str) -> bool {
        self.team(team_id).is_some()
    }
}

impl TeamMembership {
    #[must_use]
    pub fn has_role(&self, role: TeamRoleMask) -> bool {
        has_role(self.roles, role)
    }
}
