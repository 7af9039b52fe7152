//! Document detail fetching through the cache.
//!
//! A detail page is keyed by the digest of its raw URL string. If the file
//! is already in the store nothing is requested, so re-running a crawl only
//! fetches documents that are still missing.

use std::path::PathBuf;

use trawl_core::cache::{CacheStore, DETAIL_DIR, HTML_EXT};
use trawl_core::Error;

use crate::fetch::Transport;

/// What `fetch_detail` did for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    /// Already cached; no request was made.
    Cached,
    /// Downloaded and written to the cache.
    Fetched { bytes: usize },
}

/// Ensures document bodies are present in the store.
#[derive(Debug)]
pub struct DetailFetcher<'a, T: ?Sized> {
    transport: &'a T,
    store: &'a CacheStore,
}

impl<'a, T: Transport + ?Sized> DetailFetcher<'a, T> {
    pub fn new(transport: &'a T, store: &'a CacheStore) -> Self {
        Self { transport, store }
    }

    /// Cache location for a document URL.
    pub fn cache_path(&self, url: &str) -> Result<PathBuf, Error> {
        let digest = self.store.key_for(url.as_bytes());
        self.store.path_for(&digest, DETAIL_DIR, HTML_EXT)
    }

    /// Fetch `url` unless its body is already cached.
    ///
    /// # Errors
    ///
    /// - `Error::Transport` if the URL cannot be requested or no response arrives
    /// - `Error::HttpStatus` if the server answers with a non-success status
    /// - `Error::Io` if the body cannot be written to the cache
    pub async fn fetch_detail(&self, url: &str) -> Result<DetailOutcome, Error> {
        let path = self.cache_path(url)?;

        if self.store.exists(&path) {
            tracing::info!(url, "ignore {url}");
            return Ok(DetailOutcome::Cached);
        }

        tracing::info!(url, "fetch {url}");
        let response = self.transport.get(url, &[]).await?;
        if response.url != url {
            tracing::debug!(url, final_url = %response.url, "followed redirect");
        }

        self.store.write_atomic(&path, &response.bytes)?;

        Ok(DetailOutcome::Fetched { bytes: response.bytes.len() })
    }
}
