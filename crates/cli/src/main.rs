//! trawl entry point.
//!
//! Loads configuration, builds the job list and crawls each job in order.
//! Logging goes to stderr; the cache directories are the only output.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use trawl_client::{FetchClient, FetchConfig, RunDriver, SearchPaginator};
use trawl_core::{AppConfig, CacheStore};

mod jobs;

/// Crawl search listings and their documents into a content-addressed cache.
#[derive(Debug, Parser)]
#[command(name = "trawl", version)]
struct Args {
    /// TOML file with [[jobs]] entries (replaces the built-in job list)
    #[arg(long)]
    jobs: Option<PathBuf>,

    /// Directory under which html_list/ and html/ are written
    #[arg(long)]
    cache_root: Option<PathBuf>,

    /// HTTP or SOCKS proxy URL for every request
    #[arg(long)]
    proxy: Option<String>,
}

impl Args {
    fn apply(self, config: &mut AppConfig) {
        if let Some(jobs) = self.jobs {
            config.jobs_file = Some(jobs);
        }
        if let Some(cache_root) = self.cache_root {
            config.cache_root = cache_root;
        }
        if let Some(proxy) = self.proxy {
            config.proxy = Some(proxy);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load()?;
    args.apply(&mut config);
    config.validate()?;

    let jobs = match &config.jobs_file {
        Some(path) => jobs::load_jobs_file(path)?,
        None => jobs::default_jobs(),
    };

    tracing::info!(
        jobs = jobs.len(),
        cache_root = %config.cache_root.display(),
        proxy = config.proxy.as_deref().unwrap_or("none"),
        "starting trawl"
    );

    let transport = FetchClient::new(FetchConfig::from(&config))?;
    let store = CacheStore::new(&config.cache_root);
    let driver = RunDriver::new(SearchPaginator::new(transport, store, config.base_url.clone()));

    let summary = driver.run(&jobs).await;

    tracing::info!(
        completed = summary.jobs_completed,
        failed = summary.jobs_failed,
        pages_fetched = summary.pages_fetched,
        pages_cached = summary.pages_cached,
        details_fetched = summary.details_fetched,
        details_cached = summary.details_cached,
        "run finished"
    );

    Ok(())
}
