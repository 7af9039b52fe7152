//! Unified error types for trawl.
//!
//! Every crawl failure is caught at the job boundary by the run driver, so
//! each variant carries enough context (URL, status, path) to be logged on
//! its own.

use std::path::PathBuf;

/// Unified error type for cache, fetch and extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, proxy or timeout failure, or a URL that cannot be requested.
    #[error("TRANSPORT_ERROR: {url}: {reason}")]
    Transport { url: String, reason: String },

    /// Non-success HTTP response.
    #[error("HTTP_ERROR: {url}: status {status}")]
    HttpStatus { url: String, status: u16 },

    /// HTTP client could not be constructed (bad proxy, TLS backend failure).
    #[error("CLIENT_ERROR: {0}")]
    Client(String),

    /// Listing page did not have the expected structure.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// Cache read on a path that does not exist.
    #[error("NOT_FOUND: {}", .0.display())]
    NotFound(PathBuf),

    /// Filesystem failure while reading or writing the cache.
    #[error("CACHE_ERROR: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid hash format.
    #[error("CACHE_ERROR: invalid hash format")]
    InvalidHash,

    /// Crawl job parameters out of range.
    #[error("INVALID_JOB: {0}")]
    InvalidJob(String),
}

impl Error {
    /// HTTP status of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
