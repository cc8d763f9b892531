//! Search query configuration and result entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Longest query text the server accepts, in bytes.
pub const MAX_QUERY_LEN: usize = 64;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// The server reads `per_page` as a byte.
pub const MAX_PAGE_SIZE: u32 = 255;

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verification level of a mod, ordered from least to most trusted.
///
/// Levels the server adds later decode as [`Verification::Unverified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Verification {
    Unsafe,
    #[default]
    Unverified,
    Auto,
    Manual,
    Core,
}

impl Verification {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unsafe => "Unsafe",
            Self::Unverified => "Unverified",
            Self::Auto => "Auto",
            Self::Manual => "Manual",
            Self::Core => "Core",
        }
    }
}

impl From<String> for Verification {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Unsafe" => Self::Unsafe,
            "Auto" => Self::Auto,
            "Manual" => Self::Manual,
            "Core" => Self::Core,
            _ => Self::Unverified,
        }
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SearchField / SortBy
// ---------------------------------------------------------------------------

/// Which fields the query text is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    All,
    Name,
    Keywords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Downloads,
    Uploaded,
}

impl SortBy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Downloads => "downloads",
            Self::Uploaded => "uploaded",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SearchQuery
// ---------------------------------------------------------------------------

/// One query configuration. Any change to it needs a fresh cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub field: SearchField,
    pub sort_by: SortBy,
    pub reverse: bool,
    /// Minimum verification level; `None` sends no filter.
    pub verification: Option<Verification>,
    pub page_size: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            field: SearchField::default(),
            sort_by: SortBy::default(),
            reverse: false,
            verification: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchQuery {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub const fn with_field(mut self, field: SearchField) -> Self {
        self.field = field;
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort_by: SortBy, reverse: bool) -> Self {
        self.sort_by = sort_by;
        self.reverse = reverse;
        self
    }

    #[must_use]
    pub const fn with_verification(mut self, verification: Option<Verification>) -> Self {
        self.verification = verification;
        self
    }

    /// Reject configurations the server would refuse.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for over-long text or an out-of-range page size.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // The server measures UTF-8 bytes, not characters.
        let len = self.text.len();
        if len > MAX_QUERY_LEN {
            return Err(ValidationError::QueryTooLong {
                len,
                max: MAX_QUERY_LEN,
            });
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidPageSize {
                got: self.page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(())
    }

    /// Query-string pairs for one page request.
    #[must_use]
    pub fn to_params(&self, after: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", self.text.clone())];
        match self.field {
            SearchField::All => {}
            SearchField::Name => params.push(("names_only", "true".into())),
            SearchField::Keywords => params.push(("keywords_only", "true".into())),
        }
        params.push(("sort_by", self.sort_by.to_string()));
        if self.reverse {
            params.push(("reverse", "true".into()));
        }
        params.push(("per_page", self.page_size.to_string()));
        if let Some(verification) = self.verification {
            params.push(("verification", verification.to_string()));
        }
        if let Some(after) = after {
            params.push(("after", after.to_string()));
        }
        params
    }
}

// ---------------------------------------------------------------------------
// SearchEntry
// ---------------------------------------------------------------------------

/// One search hit. `key` is the content checksum and doubles as the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    #[serde(rename = "checksum")]
    pub key: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub verification: Verification,
    #[serde(default)]
    pub downloads: i64,
    pub uploaded: DateTime<Utc>,
}
