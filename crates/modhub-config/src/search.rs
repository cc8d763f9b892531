//! Search paging configuration.

use modhub_core::search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn default_scroll_threshold() -> u32 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Entries requested per page (`per_page`).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Remaining-content distance below which the next page is requested.
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            scroll_threshold: default_scroll_threshold(),
        }
    }
}

impl SearchConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::invalid(
                "search.page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        Ok(())
    }
}
