//! # modhub-search
//!
//! Incremental, cursor-based search over the site's listing.
//!
//! [`PaginationController`] is the I/O-free state machine: it hands out one
//! [`PageRequest`] at a time, corrects the server's inclusive `after`
//! boundary, detects the end of the stream and discards answers for queries
//! that were replaced in the meantime. [`Pager`] drives it against a
//! [`SearchService`] such as [`HttpSearchService`].

pub mod client;
pub mod controller;
pub mod cursor;
pub mod error;
pub mod pager;
pub mod trigger;

pub use client::{HttpSearchService, SearchService};
pub use controller::{PageOutcome, PageRequest, PageState, PaginationController};
pub use cursor::{SearchCursor, trim_boundary};
pub use error::SearchError;
pub use pager::{Pager, ResultSink};
pub use trigger::ScrollTrigger;
