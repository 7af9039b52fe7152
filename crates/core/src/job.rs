//! Crawl job definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Date format accepted for `document_date_end`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One query crawled across an inclusive page range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlJob {
    /// Free-text query; may be empty when only a phrase is searched.
    #[serde(default)]
    pub query: String,

    /// Exact phrase filter; may be empty.
    #[serde(default)]
    pub exact_phrase: String,

    /// First page to fetch (1-based).
    pub start_page: u32,

    /// Last page to fetch, inclusive.
    pub end_page: u32,

    /// Only documents dated on or before this day (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_date_end: Option<String>,
}

impl CrawlJob {
    pub fn new(query: impl Into<String>, exact_phrase: impl Into<String>, start_page: u32, end_page: u32) -> Self {
        Self { query: query.into(), exact_phrase: exact_phrase.into(), start_page, end_page, document_date_end: None }
    }

    pub fn with_document_date_end(mut self, date: impl Into<String>) -> Self {
        self.document_date_end = Some(date.into());
        self
    }

    /// Inclusive page range of the job.
    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.start_page..=self.end_page
    }

    /// Short human label for log lines.
    pub fn label(&self) -> String {
        match (self.query.is_empty(), self.exact_phrase.is_empty()) {
            (false, true) => format!("'{}'", self.query),
            (true, false) => format!("\"{}\"", self.exact_phrase),
            (false, false) => format!("'{}' \"{}\"", self.query, self.exact_phrase),
            (true, true) => "<empty>".to_string(),
        }
    }

    /// Validate page bounds and the date filter.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidJob` if:
    /// - `start_page` is 0
    /// - `end_page` is before `start_page`
    /// - `document_date_end` is not a calendar date in `YYYY-MM-DD` form
    pub fn validate(&self) -> Result<(), Error> {
        if self.start_page == 0 {
            return Err(Error::InvalidJob("start_page must be at least 1".into()));
        }

        if self.end_page < self.start_page {
            return Err(Error::InvalidJob(format!(
                "end_page {} is before start_page {}",
                self.end_page, self.start_page
            )));
        }

        if let Some(date) = &self.document_date_end
            && NaiveDate::parse_from_str(date, DATE_FORMAT).is_err()
        {
            return Err(Error::InvalidJob(format!("document_date_end '{date}' is not a YYYY-MM-DD date")));
        }

        Ok(())
    }
}
