//! Core types and shared functionality for trawl.
//!
//! This crate provides:
//! - Content-addressed file cache with atomic writes
//! - Unified error types
//! - Configuration structures
//! - Crawl job definitions

pub mod cache;
pub mod config;
pub mod error;
pub mod job;

pub use cache::CacheStore;
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use job::CrawlJob;
