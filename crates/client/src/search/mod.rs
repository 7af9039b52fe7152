//! Search listing crawl.
//!
//! Walks the result pages of one [`CrawlJob`](trawl_core::CrawlJob), caching
//! each listing page and handing every result link to the detail fetcher.
//!
//! ### Termination
//! - The page range is exhausted.
//! - A page has no result containers (end of results; not an error).
//! - A page has containers but none with an info block.
//! - Any fetch, cache or parse error. The error carries the page number and
//!   the rest of the job is abandoned without retry.

pub mod paginator;
pub mod request;

pub use paginator::SearchPaginator;
pub use request::SearchRequest;

use trawl_core::Error;

/// Why a job stopped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// Every page up to `end_page` was processed.
    #[default]
    RangeExhausted,
    /// The page had no result containers.
    NoResults { page: u32 },
    /// The page had result containers but no links could be taken from them.
    NoLinks { page: u32 },
}

/// Counters for one job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    pub pages_fetched: usize,
    pub pages_cached: usize,
    pub details_fetched: usize,
    pub details_cached: usize,
    pub stop: StopReason,
}

impl JobReport {
    pub fn pages(&self) -> usize {
        self.pages_fetched + self.pages_cached
    }

    pub fn details(&self) -> usize {
        self.details_fetched + self.details_cached
    }
}

/// A job abandoned part way through.
#[derive(Debug, thiserror::Error)]
#[error("page {page}: {source}")]
pub struct JobError {
    /// Page being processed when the error occurred
    pub page: u32,
    /// Work completed before the failure; its cache entries remain
    pub report: JobReport,
    #[source]
    pub source: Error,
}

impl JobError {
    /// HTTP status of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        self.source.status()
    }
}
