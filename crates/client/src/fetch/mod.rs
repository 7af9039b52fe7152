//! HTTP fetch layer.
//!
//! ### Transport seam
//! - Crawl logic talks to the network only through the [`Transport`] trait,
//!   so the paginator and detail fetcher can be driven by an in-memory double.
//!
//! ### Client behavior
//! - One blocking-style request at a time; callers await each response.
//! - Fixed timeout (default 10s) and browser User-Agent on every request.
//! - Optional HTTP/SOCKS proxy from configuration. System proxy detection is
//!   disabled so the configured value is the only source.
//! - Non-2xx responses become `Error::HttpStatus` with the status inline.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header};
use url::Url;

use trawl_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Proxy URL applied to every request, e.g. `socks5h://localhost:11999`
    pub proxy: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), proxy: config.proxy.clone() }
    }
}

/// Response from a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The final URL after redirects, including the query string
    pub url: String,
    /// Response body bytes
    pub bytes: Bytes,
}

/// Issues GET requests on behalf of the crawler.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with `query` appended as URL-encoded parameters.
    ///
    /// Fails with `Error::Transport` when no response was received and with
    /// `Error::HttpStatus` when the response status is not a success.
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<FetchResponse, Error>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<FetchResponse, Error> {
        (**self).get(url, query).await
    }
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .no_proxy();

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| Error::Client(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build().map_err(|e| Error::Client(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    fn transport_error(&self, url: &str, err: &reqwest::Error) -> Error {
        let reason = if err.is_timeout() {
            format!("timed out after {}ms", self.config.timeout.as_millis())
        } else if err.is_connect() {
            match &self.config.proxy {
                Some(proxy) => format!("connection failed via proxy {proxy}: {err}"),
                None => format!("connection failed: {err}"),
            }
        } else {
            format!("network error: {err}")
        };

        Error::Transport { url: url.to_string(), reason }
    }
}

#[async_trait]
impl Transport for FetchClient {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let parsed =
            Url::parse(url).map_err(|e| Error::Transport { url: url.to_string(), reason: format!("invalid URL: {e}") })?;

        let response = self
            .http
            .get(parsed)
            .query(query)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| self.transport_error(url, &e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(Error::HttpStatus { url: final_url, status: status.as_u16() });
        }

        let bytes = response.bytes().await.map_err(|e| self.transport_error(&final_url, &e))?;

        tracing::debug!(
            url = %final_url,
            status = status.as_u16(),
            bytes = bytes.len(),
            "fetched in {}ms",
            start.elapsed().as_millis()
        );

        Ok(FetchResponse { url: final_url, bytes })
    }
}
