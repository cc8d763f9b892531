use modhub_core::{ApiError, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Rejected before any request was sent.
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
