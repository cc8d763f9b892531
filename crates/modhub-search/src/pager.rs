//! Async driver that runs a [`PaginationController`] against a
//! [`SearchService`].

use modhub_core::{Credential, SearchEntry, SearchQuery};

use crate::client::SearchService;
use crate::controller::{PageOutcome, PageRequest, PageState, PaginationController};
use crate::error::SearchError;

/// Consumer of result batches. Never mutates pagination state.
pub trait ResultSink: Send {
    /// A new query started; previously delivered entries are void.
    fn cleared(&self) {}

    fn appended(&self, entries: &[SearchEntry]);

    /// No further pages exist for the current query.
    fn end_reached(&self) {}
}

pub struct Pager<S> {
    service: S,
    controller: PaginationController,
    sink: Option<Box<dyn ResultSink>>,
}

impl<S: SearchService> Pager<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            controller: PaginationController::new(),
            sink: None,
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub const fn controller(&self) -> &PaginationController {
        &self.controller
    }

    #[must_use]
    pub fn results(&self) -> &[SearchEntry] {
        self.controller.results()
    }

    #[must_use]
    pub const fn state(&self) -> PageState {
        self.controller.state()
    }

    /// Validate `query`, reset to it and fetch its first page.
    ///
    /// `credential` is the one active right now; it is not awaited or
    /// refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] without touching the current
    /// results when the query would be rejected by the server.
    pub async fn start_query(
        &mut self,
        query: SearchQuery,
        credential: Option<&Credential>,
    ) -> Result<Option<PageOutcome>, SearchError> {
        query.validate()?;
        let request = self.controller.start_query(query);
        if let Some(sink) = &self.sink {
            sink.cleared();
        }
        Ok(match request {
            Some(request) => Some(self.run(request, credential).await),
            None => None,
        })
    }

    /// Fetch the next page. `None` when nothing was requested because the
    /// results are exhausted or no query was started.
    pub async fn fetch_next_page(&mut self, credential: Option<&Credential>) -> Option<PageOutcome> {
        let request = self.controller.fetch_next_page()?;
        Some(self.run(request, credential).await)
    }

    async fn run(&mut self, request: PageRequest, credential: Option<&Credential>) -> PageOutcome {
        let request = request.authorized(credential);
        let response = self
            .service
            .fetch_page(&request)
            .await
            .map_err(SearchError::from);
        let outcome = self.controller.complete(&request, response);

        if let (Some(sink), PageOutcome::Appended { range, exhausted }) = (&self.sink, &outcome) {
            if !range.is_empty() {
                sink.appended(&self.controller.results()[range.clone()]);
            }
            if *exhausted {
                sink.end_reached();
            }
        }
        outcome
    }
}
