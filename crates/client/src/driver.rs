//! Sequential execution of a job list.

use trawl_core::CrawlJob;

use crate::fetch::Transport;
use crate::search::{JobReport, SearchPaginator, StopReason};

/// Totals across a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub jobs_completed: usize,
    pub jobs_failed: usize,
    pub pages_fetched: usize,
    pub pages_cached: usize,
    pub details_fetched: usize,
    pub details_cached: usize,
}

impl RunSummary {
    fn add(&mut self, report: &JobReport) {
        self.pages_fetched += report.pages_fetched;
        self.pages_cached += report.pages_cached;
        self.details_fetched += report.details_fetched;
        self.details_cached += report.details_cached;
    }
}

/// Runs jobs one after another; a failing job never stops the ones after it.
#[derive(Debug)]
pub struct RunDriver<T> {
    paginator: SearchPaginator<T>,
}

impl<T: Transport> RunDriver<T> {
    pub fn new(paginator: SearchPaginator<T>) -> Self {
        Self { paginator }
    }

    pub async fn run(&self, jobs: &[CrawlJob]) -> RunSummary {
        let mut summary = RunSummary::default();

        for (index, job) in jobs.iter().enumerate() {
            tracing::info!(
                job = index + 1,
                of = jobs.len(),
                pages = %format!("{}..={}", job.start_page, job.end_page),
                date_end = job.document_date_end.as_deref().unwrap_or("none"),
                "starting crawl for {}",
                job.label()
            );

            match self.paginator.run_job(job).await {
                Ok(report) => {
                    summary.jobs_completed += 1;
                    summary.add(&report);
                    log_completed(job, &report);
                }
                Err(err) => {
                    summary.jobs_failed += 1;
                    summary.add(&err.report);
                    tracing::error!(
                        job = %job.label(),
                        page = err.page,
                        status = ?err.status(),
                        error = %err.source,
                        "job abandoned"
                    );
                }
            }
        }

        summary
    }
}

fn log_completed(job: &CrawlJob, report: &JobReport) {
    let reason = match report.stop {
        StopReason::RangeExhausted => "page range exhausted".to_string(),
        StopReason::NoResults { page } => format!("no results on page {page}"),
        StopReason::NoLinks { page } => format!("no result links on page {page}"),
    };

    tracing::info!(
        job = %job.label(),
        pages_fetched = report.pages_fetched,
        pages_cached = report.pages_cached,
        details_fetched = report.details_fetched,
        details_cached = report.details_cached,
        "job finished: {reason}"
    );
}
