//! Sans-IO pagination state machine.
//!
//! The controller never performs I/O. [`PaginationController::fetch_next_page`]
//! hands out a [`PageRequest`]; whoever executes it reports back through
//! [`PaginationController::complete`]. Every request is stamped with the
//! query generation it belongs to, so an answer that arrives after
//! [`PaginationController::start_query`] replaced the query is dropped
//! instead of being mixed into the new results.

use std::ops::Range;

use modhub_core::{Credential, SearchEntry, SearchQuery};

use crate::cursor::{SearchCursor, trim_boundary};
use crate::error::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    /// One page request is in flight; further fetches are refused.
    Loading,
    /// The last page was short. Only a new query leaves this state.
    Exhausted,
}

/// One page to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    generation: u64,
    query: SearchQuery,
    after: Option<String>,
    credential: Option<Credential>,
}

impl PageRequest {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn query(&self) -> &SearchQuery {
        &self.query
    }

    #[must_use]
    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.query.page_size
    }

    #[must_use]
    pub const fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Attach the credential active at dispatch time. `None` sends the
    /// request unauthenticated.
    #[must_use]
    pub fn authorized(mut self, credential: Option<&Credential>) -> Self {
        self.credential = credential.cloned();
        self
    }

    /// Query-string pairs for this page.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        self.query.to_params(self.after())
    }
}

/// What [`PaginationController::complete`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Entries were appended to the results at `range`.
    Appended {
        range: Range<usize>,
        exhausted: bool,
    },
    /// The response belongs to a replaced query, or nothing was in flight.
    Stale,
    /// The fetch failed. The cursor is unchanged and the next fetch retries it.
    Failed(SearchError),
}

#[derive(Debug, Clone)]
pub struct PaginationController {
    generation: u64,
    query: Option<SearchQuery>,
    cursor: SearchCursor,
    state: PageState,
    results: Vec<SearchEntry>,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: 0,
            query: None,
            cursor: SearchCursor::new(modhub_core::search::DEFAULT_PAGE_SIZE),
            state: PageState::Idle,
            results: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> PageState {
        self.state
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn cursor(&self) -> &SearchCursor {
        &self.cursor
    }

    #[must_use]
    pub const fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    /// Every entry received for the current query, in server order.
    #[must_use]
    pub fn results(&self) -> &[SearchEntry] {
        &self.results
    }

    /// Replace the query: new generation, fresh cursor, empty results.
    /// Returns the request for the first page.
    pub fn start_query(&mut self, query: SearchQuery) -> Option<PageRequest> {
        self.generation += 1;
        self.cursor = SearchCursor::new(query.page_size);
        self.results.clear();
        self.state = PageState::Idle;
        tracing::debug!(
            generation = self.generation,
            query = %query.text,
            page_size = query.page_size,
            "starting search"
        );
        self.query = Some(query);
        self.fetch_next_page()
    }

    /// Request the next page. `None` while a page is loading, once the
    /// results are exhausted, or before any query was started.
    pub fn fetch_next_page(&mut self) -> Option<PageRequest> {
        if self.state != PageState::Idle {
            tracing::trace!(state = ?self.state, "fetch refused");
            return None;
        }
        let query = self.query.clone()?;
        self.state = PageState::Loading;
        Some(PageRequest {
            generation: self.generation,
            query,
            after: self.cursor.last_seen_key().map(ToString::to_string),
            credential: None,
        })
    }

    /// Apply the response to `request`.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        response: Result<Vec<SearchEntry>, SearchError>,
    ) -> PageOutcome {
        if request.generation != self.generation || self.state != PageState::Loading {
            tracing::debug!(
                request_generation = request.generation,
                current_generation = self.generation,
                "discarding stale page"
            );
            return PageOutcome::Stale;
        }

        let page = match response {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!(%error, after = ?request.after, "page fetch failed");
                self.state = PageState::Idle;
                return PageOutcome::Failed(error);
            }
        };

        let raw_len = page.len();
        let page = trim_boundary(request.after(), page);
        let exhausted = self.cursor.advance(raw_len, &page);

        let start = self.results.len();
        self.results.extend(page);
        let range = start..self.results.len();

        self.state = if exhausted {
            PageState::Exhausted
        } else {
            PageState::Idle
        };
        tracing::debug!(
            received = raw_len,
            appended = range.len(),
            exhausted,
            "page applied"
        );
        PageOutcome::Appended { range, exhausted }
    }
}
