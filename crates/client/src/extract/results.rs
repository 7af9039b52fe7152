//! Result-link extraction from search listing pages.

use scraper::{ElementRef, Html, Selector};
use trawl_core::Error;

/// Link value recorded for a result whose info block has no anchor.
pub const MISSING_LINK: &str = "N/A";

/// A document link found in one search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultLink {
    /// Raw `href` as it appears in the listing
    pub href: String,
}

/// Structural summary of one listing page.
#[derive(Debug, Default)]
pub struct ListingPage {
    /// Number of `div.result` containers on the page
    pub containers: usize,
    /// One entry per container that has a `div.info` block, in document order.
    ///
    /// A container whose anchor has no `href` yields `Err(Error::Parse)` in
    /// its own slot, so links before it can still be processed.
    pub links: Vec<Result<SearchResultLink, Error>>,
}

impl ListingPage {
    /// A page without result containers marks the end of the result set.
    pub fn is_exhausted(&self) -> bool {
        self.containers == 0
    }
}

/// Extract result links from a listing page.
///
/// Each `div.result` container contributes the `href` of the first `<a>`
/// inside its `div.info` block. A container whose info block has no anchor
/// contributes [`MISSING_LINK`] rather than being dropped; a container
/// without an info block contributes nothing. An anchor without `href`
/// contributes an `Error::Parse` entry.
pub fn extract_result_links(html: &str) -> ListingPage {
    let document = Html::parse_document(html);
    let result_selector = Selector::parse("div.result").expect("invalid selector");

    let mut page = ListingPage::default();

    for (index, container) in document.select(&result_selector).enumerate() {
        page.containers += 1;

        if let Some(link) = link_in_container(container, index) {
            page.links.push(link);
        }
    }

    page
}

fn link_in_container(container: ElementRef<'_>, index: usize) -> Option<Result<SearchResultLink, Error>> {
    let info_selector = Selector::parse("div.info").expect("invalid selector");
    let anchor_selector = Selector::parse("a").expect("invalid selector");

    let info = container.select(&info_selector).next()?;

    let link = match info.select(&anchor_selector).next() {
        Some(anchor) => anchor
            .value()
            .attr("href")
            .map(|href| SearchResultLink { href: href.to_string() })
            .ok_or_else(|| Error::Parse(format!("result {}: link in info block has no href", index + 1))),
        None => Ok(SearchResultLink { href: MISSING_LINK.to_string() }),
    };

    Some(link)
}
