//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (TRAWL_*)
//! 2. `HTTP_PROXY` (as the proxy setting)
//! 3. TOML config file (if TRAWL_CONFIG_FILE set)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Search endpoint crawled when no other base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://search.wikileaks.org/advanced";

/// Desktop browser identification; bare client user agents get blocked by the endpoint.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (TRAWL_*)
/// 2. `HTTP_PROXY` environment variable (proxy only)
/// 3. TOML config file (if TRAWL_CONFIG_FILE set)
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search endpoint receiving the listing queries.
    ///
    /// Set via TRAWL_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory under which `html_list/` and `html/` are created.
    ///
    /// Set via TRAWL_CACHE_ROOT environment variable.
    #[serde(default = "default_cache_root")]
    pub cache_root: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via TRAWL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via TRAWL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// HTTP or SOCKS proxy applied to every request.
    ///
    /// Set via HTTP_PROXY, or TRAWL_PROXY which takes precedence.
    #[serde(default)]
    pub proxy: Option<String>,

    /// TOML file with `[[jobs]]` entries replacing the built-in job list.
    ///
    /// Set via TRAWL_JOBS_FILE environment variable.
    #[serde(default)]
    pub jobs_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_cache_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cache_root: default_cache_root(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            proxy: None,
            jobs_file: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("TRAWL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment
            .merge(Env::raw().only(&["http_proxy"]).map(|_| "proxy".into()))
            .merge(Env::prefixed("TRAWL_").map(|key| key.as_str().to_lowercase().into()));

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
