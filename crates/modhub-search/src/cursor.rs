//! Position within one query's result stream.

use modhub_core::SearchEntry;

/// Cursor for one query configuration.
///
/// `last_seen_key` is the key of the last entry of the most recent page and
/// is sent as `after` on the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCursor {
    last_seen_key: Option<String>,
    page_size: u32,
    exhausted: bool,
}

impl SearchCursor {
    /// Fresh cursor. A zero page size is raised to one.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            last_seen_key: None,
            page_size: page_size.max(1),
            exhausted: false,
        }
    }

    #[must_use]
    pub fn last_seen_key(&self) -> Option<&str> {
        self.last_seen_key.as_deref()
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Record a received page and report whether the stream has ended.
    ///
    /// `raw_len` is the page length as sent by the server, `corrected` the
    /// page after [`trim_boundary`]. A short raw page or an empty corrected
    /// page ends the stream.
    pub(crate) fn advance(&mut self, raw_len: usize, corrected: &[SearchEntry]) -> bool {
        let full = u32::try_from(raw_len).is_ok_and(|len| len >= self.page_size);
        match corrected.last() {
            Some(last) if full => {
                self.last_seen_key = Some(last.key.clone());
            }
            _ => self.exhausted = true,
        }
        self.exhausted
    }
}

/// Drop the leading entry if it repeats the `after` boundary.
///
/// The server treats `after` inclusively, so the entry named by the cursor
/// comes back first. Only that single leading entry is removed.
#[must_use]
pub fn trim_boundary(after: Option<&str>, mut page: Vec<SearchEntry>) -> Vec<SearchEntry> {
    let repeats = after.is_some_and(|after| page.first().is_some_and(|first| first.key == after));
    if repeats {
        page.remove(0);
    }
    page
}
