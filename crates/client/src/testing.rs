//! In-memory transport for network-free tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use trawl_core::Error;
use url::Url;

use crate::fetch::{FetchResponse, Transport};

pub(crate) const BASE_URL: &str = "https://search.example.org/advanced";

#[derive(Debug, Clone)]
enum Route {
    Body(String),
    Status(u16),
    Unreachable,
}

/// Serves canned responses and records every request.
///
/// Requests carrying a `page` parameter are keyed as `<url>?page=<n>`;
/// anything else is keyed by the bare URL. Unknown routes answer 404.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    routes: HashMap<String, Route>,
    calls: Mutex<Vec<String>>,
    queries: Mutex<Vec<Vec<(String, String)>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.routes.insert(url.to_string(), Route::Body(body.into()));
        self
    }

    pub(crate) fn with_listing(self, page: u32, body: impl Into<String>) -> Self {
        self.with_page(&listing_key(page), body)
    }

    pub(crate) fn with_status(mut self, url: &str, status: u16) -> Self {
        self.routes.insert(url.to_string(), Route::Status(status));
        self
    }

    pub(crate) fn with_listing_status(self, page: u32, status: u16) -> Self {
        self.with_status(&listing_key(page), status)
    }

    pub(crate) fn with_unreachable(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Route::Unreachable);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn detail_calls(&self) -> Vec<String> {
        self.calls().into_iter().filter(|c| !c.starts_with(BASE_URL)).collect()
    }

    pub(crate) fn listing_calls(&self) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.starts_with(BASE_URL)).collect()
    }

    pub(crate) fn last_query(&self) -> Option<Vec<(String, String)>> {
        self.queries.lock().unwrap().last().cloned()
    }
}

pub(crate) fn listing_key(page: u32) -> String {
    format!("{BASE_URL}?page={page}")
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<FetchResponse, Error> {
        let key = match query.iter().find(|(name, _)| *name == "page") {
            Some((_, page)) => format!("{url}?page={page}"),
            None => url.to_string(),
        };

        self.calls.lock().unwrap().push(key.clone());
        self.queries
            .lock()
            .unwrap()
            .push(query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect());

        if let Err(e) = Url::parse(url) {
            return Err(Error::Transport { url: url.to_string(), reason: format!("invalid URL: {e}") });
        }

        match self.routes.get(&key).cloned().unwrap_or(Route::Status(404)) {
            Route::Body(body) => Ok(FetchResponse { url: key, bytes: Bytes::from(body) }),
            Route::Status(status) => Err(Error::HttpStatus { url: key, status }),
            Route::Unreachable => Err(Error::Transport { url: key, reason: "connection refused".into() }),
        }
    }
}

/// Listing page with one result container per href.
pub(crate) fn listing_html(hrefs: &[&str]) -> String {
    let results: String = hrefs
        .iter()
        .map(|href| {
            format!(r#"<div class="result"><div class="info"><a href="{href}">Document</a></div><p>snippet</p></div>"#)
        })
        .collect();
    format!("<html><body><div class=\"results\">{results}</div></body></html>")
}

pub(crate) fn empty_listing_html() -> String {
    "<html><body><p>No results</p></body></html>".to_string()
}
