//! # modhub-core
//!
//! Core types shared by every modhub crate.
//!
//! - Identity and team membership records returned by the site
//! - Role and team-role flag sets with integer containment checks
//! - Scoped bearer credentials
//! - Search query configuration and result entries
//! - The `ApiError` taxonomy and HTTP helpers used by both remote clients

pub mod credential;
pub mod errors;
pub mod http;
pub mod identity;
pub mod roles;
pub mod search;

pub use credential::{Credential, CredentialScope};
pub use errors::{ApiError, ValidationError};
pub use identity::{Identity, TeamMembership};
pub use roles::{RoleMask, TeamRoleMask, has_role};
pub use search::{SearchEntry, SearchField, SearchQuery, SortBy, Verification};
