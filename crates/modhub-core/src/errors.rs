//! Cross-cutting error types for modhub.
//!
//! `ApiError` is the failure taxonomy of every remote call. Crate-specific
//! errors (`SessionError`, `SearchError`, ...) wrap it.

use thiserror::Error;

/// Failure of one call to the site's HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No credential, or the server rejected it (401, or "no session").
    #[error("not authenticated")]
    Unauthenticated,

    /// Credential accepted but the role is insufficient (403).
    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    /// Malformed request or already-resolved state (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// No response at all (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// Response arrived but the body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success HTTP status and its body.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthenticated,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 => Self::BadRequest(message),
            _ => Self::Status { status, message },
        }
    }

    /// True when the server never answered.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Client-side rejection of a search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("query is {len} bytes, the server accepts at most {max}")]
    QueryTooLong { len: usize, max: usize },

    #[error("page size must be between 1 and {max}, got {got}")]
    InvalidPageSize { got: u32, max: u32 },
}
