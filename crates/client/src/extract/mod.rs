//! Structural extraction from cached listing pages.
//!
//! Extraction is a pure function of the page HTML: it never touches the
//! network or the cache, so it can be tested and swapped on its own.
//!
//! ### Selector chain
//! - `div.result` marks one search hit.
//! - Its first `div.info` descendant holds the title block.
//! - The first `<a>` in that block carries the document URL.

pub mod results;

pub use results::{ListingPage, MISSING_LINK, SearchResultLink, extract_result_links};
