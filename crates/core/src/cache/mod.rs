//! Content-addressed file cache for crawled pages.
//!
//! This module provides a persistent cache laid out directly on the
//! filesystem. It supports:
//!
//! - Content-addressed keys using SHA-256 hashing
//! - Directory sharding by digest prefix
//! - Atomic writes (temp file, fsync, rename)

pub mod hash;
pub mod store;

pub use store::{CacheStore, DETAIL_DIR, HTML_EXT, LISTING_DIR, StagedWrite};
