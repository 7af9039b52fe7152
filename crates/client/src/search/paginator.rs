//! Page-by-page crawl of a single job.

use trawl_core::cache::{CacheStore, HTML_EXT, LISTING_DIR};
use trawl_core::{CrawlJob, Error};

use super::{JobError, JobReport, SearchRequest, StopReason};
use crate::detail::{DetailFetcher, DetailOutcome};
use crate::extract::extract_result_links;
use crate::fetch::Transport;

enum PageOutcome {
    Continue,
    Stop(StopReason),
}

/// Crawls search listings and their linked documents into the cache.
#[derive(Debug)]
pub struct SearchPaginator<T> {
    transport: T,
    store: CacheStore,
    base_url: String,
}

impl<T: Transport> SearchPaginator<T> {
    pub fn new(transport: T, store: CacheStore, base_url: impl Into<String>) -> Self {
        Self { transport, store, base_url: base_url.into() }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn detail_fetcher(&self) -> DetailFetcher<'_, T> {
        DetailFetcher::new(&self.transport, &self.store)
    }

    /// Crawl `job` page by page until a stop condition is reached.
    ///
    /// # Errors
    ///
    /// Returns `JobError` if the job is invalid or any page fails. Pages and
    /// documents cached before the failure stay cached.
    pub async fn run_job(&self, job: &CrawlJob) -> Result<JobReport, JobError> {
        let mut report = JobReport::default();

        if let Err(source) = job.validate() {
            return Err(JobError { page: job.start_page, report, source });
        }

        let details = self.detail_fetcher();

        for page in job.pages() {
            tracing::info!(job = %job.label(), page, "crawling page {page}");

            match self.crawl_page(job, page, &details, &mut report).await {
                Ok(PageOutcome::Continue) => {}
                Ok(PageOutcome::Stop(reason)) => {
                    report.stop = reason;
                    return Ok(report);
                }
                Err(source) => return Err(JobError { page, report, source }),
            }
        }

        report.stop = StopReason::RangeExhausted;
        Ok(report)
    }

    async fn crawl_page(
        &self, job: &CrawlJob, page: u32, details: &DetailFetcher<'_, T>, report: &mut JobReport,
    ) -> Result<PageOutcome, Error> {
        let request = SearchRequest::for_page(&self.base_url, job, page);
        let html = self.load_listing(&request, report).await?;

        let listing = extract_result_links(&html);

        if listing.is_exhausted() {
            tracing::info!(page, "no result containers on page {page}; end of results");
            return Ok(PageOutcome::Stop(StopReason::NoResults { page }));
        }

        let found = listing.links.len();

        // Containers are handled in document order; a malformed one stops the
        // page only after the links before it are cached.
        for link in listing.links {
            match details.fetch_detail(&link?.href).await? {
                DetailOutcome::Cached => report.details_cached += 1,
                DetailOutcome::Fetched { .. } => report.details_fetched += 1,
            }
        }

        if found == 0 {
            tracing::warn!(
                page,
                containers = listing.containers,
                "result containers on page {page} had no info block; stopping job"
            );
            return Ok(PageOutcome::Stop(StopReason::NoLinks { page }));
        }

        Ok(PageOutcome::Continue)
    }

    /// Listing HTML for `request`, from the cache when present.
    async fn load_listing(&self, request: &SearchRequest, report: &mut JobReport) -> Result<String, Error> {
        let digest = request.cache_key()?;
        let path = self.store.path_for(&digest, LISTING_DIR, HTML_EXT)?;

        if self.store.exists(&path) {
            tracing::info!(digest = %digest, "ignore {digest}");
            let bytes = self.store.read(&path)?;
            report.pages_cached += 1;
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }

        let response = self.transport.get(&request.base_url, &request.query_pairs()).await?;
        self.store.write_atomic(&path, &response.bytes)?;
        report.pages_fetched += 1;

        Ok(String::from_utf8_lossy(&response.bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BASE_URL, MockTransport, empty_listing_html, listing_html, listing_key};
    use tempfile::tempdir;

    const DOCS: [&str; 3] = [
        "https://search.example.org/doc/a",
        "https://search.example.org/doc/b",
        "https://search.example.org/doc/c",
    ];

    fn scenario_job() -> CrawlJob {
        CrawlJob::new("x", "", 1, 2).with_document_date_end("2003-06-01")
    }

    fn transport_with_docs() -> MockTransport {
        DOCS.iter().fold(MockTransport::new(), |t, doc| t.with_page(doc, format!("<html>{doc}</html>")))
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let dir = tempdir().unwrap();
        let transport = transport_with_docs()
            .with_listing(1, listing_html(&DOCS))
            .with_listing(2, empty_listing_html());
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let report = paginator.run_job(&scenario_job()).await.unwrap();

        assert_eq!(transport.detail_calls(), DOCS.to_vec());
        assert_eq!(transport.listing_calls(), vec![listing_key(1), listing_key(2)]);
        assert_eq!(report.details_fetched, 3);
        assert_eq!(report.pages_fetched, 2);
        assert_eq!(report.stop, StopReason::NoResults { page: 2 });

        for doc in DOCS {
            let path = paginator.detail_fetcher().cache_path(doc).unwrap();
            assert_eq!(paginator.store().read(&path).unwrap(), format!("<html>{doc}</html>").as_bytes());
        }
    }

    #[tokio::test]
    async fn test_zero_containers_stops_whole_job() {
        let dir = tempdir().unwrap();
        let transport = MockTransport::new()
            .with_listing(1, empty_listing_html())
            .with_listing(2, listing_html(&DOCS));
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let report = paginator.run_job(&CrawlJob::new("x", "", 1, 5)).await.unwrap();

        assert_eq!(report.stop, StopReason::NoResults { page: 1 });
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_range_exhausted() {
        let dir = tempdir().unwrap();
        let transport = transport_with_docs()
            .with_listing(1, listing_html(&DOCS[..2]))
            .with_listing(2, listing_html(&DOCS[2..]));
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let report = paginator.run_job(&CrawlJob::new("x", "", 1, 2)).await.unwrap();

        assert_eq!(report.stop, StopReason::RangeExhausted);
        assert_eq!(report.pages(), 2);
        assert_eq!(report.details(), 3);
        assert_eq!(transport.listing_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_rerun_is_served_from_cache() {
        let dir = tempdir().unwrap();
        let transport = transport_with_docs()
            .with_listing(1, listing_html(&DOCS))
            .with_listing(2, empty_listing_html());
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        paginator.run_job(&scenario_job()).await.unwrap();
        let calls_after_first_run = transport.call_count();
        let report = paginator.run_job(&scenario_job()).await.unwrap();

        assert_eq!(transport.call_count(), calls_after_first_run);
        assert_eq!(report.pages_cached, 2);
        assert_eq!(report.details_cached, 3);
        assert_eq!(report.details_fetched, 0);
    }

    #[tokio::test]
    async fn test_listing_error_aborts_job_and_keeps_earlier_pages() {
        let dir = tempdir().unwrap();
        let transport = transport_with_docs()
            .with_listing(1, listing_html(&DOCS[..1]))
            .with_listing_status(2, 502)
            .with_listing(3, listing_html(&DOCS[1..]));
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let err = paginator.run_job(&CrawlJob::new("x", "", 1, 3)).await.unwrap_err();

        assert_eq!(err.page, 2);
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.report.details_fetched, 1);
        assert_eq!(transport.listing_calls(), vec![listing_key(1), listing_key(2)]);

        let cached = paginator.detail_fetcher().cache_path(DOCS[0]).unwrap();
        assert!(paginator.store().exists(&cached));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let dir = tempdir().unwrap();
        let transport = MockTransport::new().with_unreachable(&listing_key(1));
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let err = paginator.run_job(&CrawlJob::new("x", "", 1, 2)).await.unwrap_err();

        assert_eq!(err.page, 1);
        assert!(matches!(err.source, Error::Transport { .. }));
        assert_eq!(err.status(), None);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_anchor_fails_at_fetch() {
        let dir = tempdir().unwrap();
        let listing = r#"<html><body>
            <div class="result"><div class="info"><span>withdrawn</span></div></div>
            <div class="result"><div class="info"><a href="https://search.example.org/doc/a">A</a></div></div>
        </body></html>"#;
        let transport = transport_with_docs().with_listing(1, listing);
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let err = paginator.run_job(&CrawlJob::new("x", "", 1, 3)).await.unwrap_err();

        assert_eq!(err.page, 1);
        assert!(matches!(err.source, Error::Transport { ref url, .. } if url == "N/A"));
        assert_eq!(transport.detail_calls(), vec!["N/A".to_string()]);
    }

    #[tokio::test]
    async fn test_anchor_without_href_after_valid_result_keeps_earlier_document() {
        let dir = tempdir().unwrap();
        let listing = r#"<html><body>
            <div class="result"><div class="info"><a href="https://search.example.org/doc/a">A</a></div></div>
            <div class="result"><div class="info"><a name="x">B</a></div></div>
            <div class="result"><div class="info"><a href="https://search.example.org/doc/b">C</a></div></div>
        </body></html>"#;
        let transport = transport_with_docs().with_listing(1, listing);
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let err = paginator.run_job(&CrawlJob::new("x", "", 1, 1)).await.unwrap_err();

        assert_eq!(err.page, 1);
        assert!(matches!(err.source, Error::Parse(_)));
        assert_eq!(err.report.details_fetched, 1);
        assert_eq!(transport.detail_calls(), vec![DOCS[0].to_string()]);

        let cached = paginator.detail_fetcher().cache_path(DOCS[0]).unwrap();
        assert!(paginator.store().exists(&cached));
    }

    #[tokio::test]
    async fn test_containers_without_info_stop_job() {
        let dir = tempdir().unwrap();
        let listing = r#"<div class="result"><p>teaser</p></div><div class="result"><p>teaser</p></div>"#;
        let transport = MockTransport::new().with_listing(1, listing).with_listing(2, listing_html(&DOCS));
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let report = paginator.run_job(&CrawlJob::new("x", "", 1, 2)).await.unwrap();

        assert_eq!(report.stop, StopReason::NoLinks { page: 1 });
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_job_parameters() {
        let dir = tempdir().unwrap();
        let transport = MockTransport::new().with_listing(4, empty_listing_html());
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let job = CrawlJob::new("", "gang of four", 4, 39).with_document_date_end("2003-06-01");
        paginator.run_job(&job).await.unwrap();

        let query = transport.last_query().unwrap();
        assert!(query.contains(&("exact_phrase".to_string(), "gang of four".to_string())));
        assert!(query.contains(&("document_date_end".to_string(), "2003-06-01".to_string())));
        assert!(query.contains(&("page".to_string(), "4".to_string())));
        assert!(query.contains(&("new_search".to_string(), "True".to_string())));
    }

    #[tokio::test]
    async fn test_listing_cached_under_request_digest() {
        let dir = tempdir().unwrap();
        let transport = MockTransport::new().with_listing(1, empty_listing_html());
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let job = CrawlJob::new("x", "", 1, 1);
        paginator.run_job(&job).await.unwrap();

        let digest = SearchRequest::for_page(BASE_URL, &job, 1).cache_key().unwrap();
        let expected = dir.path().join("html_list").join(&digest[..4]).join(format!("{digest}.html"));
        assert!(expected.is_file());
    }

    #[tokio::test]
    async fn test_invalid_job_rejected_before_network() {
        let dir = tempdir().unwrap();
        let transport = MockTransport::new();
        let paginator = SearchPaginator::new(&transport, CacheStore::new(dir.path()), BASE_URL);

        let err = paginator.run_job(&CrawlJob::new("x", "", 3, 2)).await.unwrap_err();

        assert!(matches!(err.source, Error::InvalidJob(_)));
        assert_eq!(transport.call_count(), 0);
    }
}
