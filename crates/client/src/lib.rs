//! Client code for trawl.
//!
//! This crate provides the HTTP transport, result-link extraction, the
//! cache-backed detail fetcher, the search paginator and the run driver.

pub mod detail;
pub mod driver;
pub mod extract;
pub mod fetch;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use detail::{DetailFetcher, DetailOutcome};
pub use driver::{RunDriver, RunSummary};
pub use extract::{ListingPage, SearchResultLink, extract_result_links};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, Transport};
pub use search::{JobError, JobReport, SearchPaginator, SearchRequest, StopReason};
