//! Search listing request parameters and fingerprinting.

use std::collections::BTreeMap;

use trawl_core::cache::hash;
use trawl_core::{CrawlJob, Error};

/// Result ordering sent with every request.
pub const ORDER_BY: &str = "most_relevant";

/// Parameters of one listing-page request.
///
/// The endpoint is sensitive to the full parameter set, so unused filters are
/// always sent as empty strings. `document_date_end` is the one exception: it
/// is left out entirely when unset, which also gives it a distinct fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub base_url: String,
    pub page: u32,
    pub query: String,
    pub exact_phrase: String,
    pub document_date_end: Option<String>,
    pub any_of: String,
    pub exclude_words: String,
    pub released_date_start: String,
    pub released_date_end: String,
    pub document_date_start: String,
    pub order_by: String,
    pub new_search: String,
}

impl SearchRequest {
    /// Request with every filter at its default and no search terms.
    pub fn new(base_url: impl Into<String>, page: u32) -> Self {
        Self {
            base_url: base_url.into(),
            page,
            query: String::new(),
            exact_phrase: String::new(),
            document_date_end: None,
            any_of: String::new(),
            exclude_words: String::new(),
            released_date_start: String::new(),
            released_date_end: String::new(),
            document_date_start: String::new(),
            order_by: ORDER_BY.to_string(),
            new_search: "True".to_string(),
        }
    }

    /// Request for `page` of `job`.
    pub fn for_page(base_url: &str, job: &CrawlJob, page: u32) -> Self {
        Self {
            query: job.query.clone(),
            exact_phrase: job.exact_phrase.clone(),
            document_date_end: job.document_date_end.clone(),
            ..Self::new(base_url, page)
        }
    }

    /// Query parameters keyed by name, in sorted order.
    pub fn params(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::from([
            ("any_of", self.any_of.clone()),
            ("page", self.page.to_string()),
            ("exact_phrase", self.exact_phrase.clone()),
            ("query", self.query.clone()),
            ("released_date_end", self.released_date_end.clone()),
            ("document_date_start", self.document_date_start.clone()),
            ("order_by", self.order_by.clone()),
            ("released_date_start", self.released_date_start.clone()),
            ("new_search", self.new_search.clone()),
            ("exclude_words", self.exclude_words.clone()),
        ]);

        if let Some(date) = &self.document_date_end {
            params.insert("document_date_end", date.clone());
        }

        params
    }

    /// Parameters as pairs for the transport.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.params().into_iter().collect()
    }

    /// Base URL followed by the parameters as a JSON object with sorted keys.
    ///
    /// Equal field values always serialize to the same bytes.
    pub fn canonical_serialize(&self) -> Result<String, Error> {
        let params = serde_json::to_string(&self.params())
            .map_err(|e| Error::Parse(format!("failed to serialize search request: {e}")))?;
        Ok(format!("{}{}", self.base_url, params))
    }

    /// Cache key for the listing page this request returns.
    pub fn cache_key(&self) -> Result<String, Error> {
        Ok(hash::key_for(self.canonical_serialize()?.as_bytes()))
    }
}
