//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Length of the digest prefix used as the shard directory name.
pub const SHARD_PREFIX_LEN: usize = 4;

/// Compute a content-addressed cache key for an arbitrary byte string.
///
/// Listing pages are keyed by their canonical request serialization,
/// detail pages by the raw URL string.
///
/// Keys are not compatible with caches written by earlier MD5-based crawl
/// scripts; such `html/` and `html_list/` trees are never seen as hits and
/// their pages are fetched again.
pub fn key_for(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Check that a digest can be used to build a cache path.
pub fn is_valid_digest(digest: &str) -> bool {
    digest.len() >= SHARD_PREFIX_LEN && digest.chars().all(|c| c.is_ascii_hexdigit())
}
