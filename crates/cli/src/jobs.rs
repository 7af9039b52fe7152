//! Job list for a run: built-in defaults or a TOML jobs file.

use std::path::Path;

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Format, Toml},
};
use serde::Deserialize;
use trawl_core::CrawlJob;

const DATE_CUTOFF: &str = "2003-06-01";

/// Shape of a jobs file: a list of `[[jobs]]` tables.
#[derive(Debug, Deserialize)]
struct JobsFile {
    jobs: Vec<CrawlJob>,
}

/// Jobs crawled when no jobs file is configured.
pub fn default_jobs() -> Vec<CrawlJob> {
    [
        ("deng xiaoping", "", 41),
        ("mao zedong", "", 8),
        ("", "jiang qing", 1),
        ("", "mao yuanxin", 1),
        ("", "gang of four", 39),
        ("", "mao tse-tung", 35),
        ("", "hsiao-ping", 50),
    ]
    .into_iter()
    .map(|(query, phrase, end_page)| CrawlJob::new(query, phrase, 1, end_page).with_document_date_end(DATE_CUTOFF))
    .collect()
}

/// Load and validate every job in a TOML jobs file.
pub fn load_jobs_file(path: &Path) -> Result<Vec<CrawlJob>> {
    if !path.is_file() {
        anyhow::bail!("jobs file {} does not exist", path.display());
    }

    let file: JobsFile = Figment::from(Toml::file(path))
        .extract()
        .with_context(|| format!("failed to parse jobs file {}", path.display()))?;

    for (index, job) in file.jobs.iter().enumerate() {
        job.validate().with_context(|| format!("job {} in {}", index + 1, path.display()))?;
    }

    Ok(file.jobs)
}
