//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - built-in defaults for the deployment maturity (`MATURITY` env var)
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (GRANULE_SEARCH_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [catalog]
//! base_url = "https://cmr.uat.earthdata.nasa.gov"
//! request_timeout_ms = 30000
//!
//! [query]
//! default_page_size = 500
//! list_exempt_filters = ["granule_list", "product_list", "platform"]
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! GRANULE_SEARCH_CATALOG__BASE_URL=http://localhost:3003
//! GRANULE_SEARCH_QUERY__TIME_BUDGET_MS=60000
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::decompose::DEFAULT_LIST_EXEMPT_FILTERS;

/// Environment variable selecting the deployment maturity
pub const MATURITY_ENV: &str = "MATURITY";

const ENV_PREFIX: &str = "GRANULE_SEARCH_";

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub maturity: Maturity,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Deployment maturity, which selects the catalog host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Maturity {
    Devel,
    Test,
    #[default]
    Prod,
    ProdPrivate,
}

impl Maturity {
    /// Catalog host for this maturity
    pub fn catalog_base(self) -> &'static str {
        match self {
            Maturity::Devel | Maturity::Test => "https://cmr.uat.earthdata.nasa.gov",
            Maturity::Prod | Maturity::ProdPrivate => "https://cmr.earthdata.nasa.gov",
        }
    }

    /// Maturity named by the `MATURITY` env var, `prod` when unset
    pub fn from_env() -> Self {
        match std::env::var(MATURITY_ENV) {
            Ok(name) => name.parse().unwrap_or_else(|_| {
                tracing::warn!(maturity = %name, "unknown_maturity_defaulting_to_prod");
                Maturity::Prod
            }),
            Err(_) => {
                tracing::warn!("maturity_not_set_defaulting_to_prod");
                Maturity::Prod
            }
        }
    }
}

impl FromStr for Maturity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "devel" => Ok(Maturity::Devel),
            "test" => Ok(Maturity::Test),
            "prod" => Ok(Maturity::Prod),
            "prod-private" => Ok(Maturity::ProdPrivate),
            other => Err(format!("unknown maturity '{other}'")),
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Maturity::Devel => "devel",
            Maturity::Test => "test",
            Maturity::Prod => "prod",
            Maturity::ProdPrivate => "prod-private",
        };
        f.write_str(name)
    }
}

/// Remote catalog endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog host, without trailing slash
    #[serde(default = "default_catalog_base")]
    pub base_url: String,

    /// Granule search path (appended to base_url)
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Health endpoint path (appended to base_url)
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Value of the `Client-Id` header sent with every request
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Per-request timeout in milliseconds. 0 = no timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Query session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Provider every request is pinned to
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Page size requested unless max_results is smaller
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Wall-clock budget per session in milliseconds
    #[serde(default = "default_time_budget_ms")]
    pub time_budget_ms: u64,

    /// Filters sent as repeated fields instead of being branched
    #[serde(default = "default_list_exempt_filters")]
    pub list_exempt_filters: Vec<String>,
}

impl QueryConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or an EnvFilter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Append logs to this file instead of stderr
    #[serde(default)]
    pub file: Option<String>,
}

// Default value functions
fn default_catalog_base() -> String {
    Maturity::default().catalog_base().to_string()
}
fn default_search_path() -> String {
    "/search/granules.umm_json_v1_4".to_string()
}
fn default_health_path() -> String {
    "/search/health".to_string()
}
fn default_client_id() -> String {
    "vertex_asf".to_string()
}
fn default_request_timeout_ms() -> u64 {
    60_000
}
fn default_provider() -> String {
    "ASF".to_string()
}
fn default_page_size() -> usize {
    2000
}
fn default_time_budget_ms() -> u64 {
    870_000 // 14.5 minutes
}
fn default_list_exempt_filters() -> Vec<String> {
    DEFAULT_LIST_EXEMPT_FILTERS
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. Defaults for the maturity named by `MATURITY`
    /// 2. config.toml (base configuration)
    /// 3. config.local.toml (local overrides, git-ignored)
    /// 4. Environment variables (GRANULE_SEARCH_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        let env_maturity = Maturity::from_env();
        Figment::from(Serialized::defaults(Config::for_maturity(env_maturity)))
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract::<Config>()
            .map(|config| config.with_maturity_host(env_maturity))
    }

    /// Load configuration from specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        let env_maturity = Maturity::from_env();
        Figment::from(Serialized::defaults(Config::for_maturity(env_maturity)))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract::<Config>()
            .map(|config| config.with_maturity_host(env_maturity))
    }

    /// A `maturity` key from a file or env var moves the catalog host with it,
    /// unless `catalog.base_url` was pinned to another host.
    fn with_maturity_host(mut self, default_maturity: Maturity) -> Self {
        if self.maturity != default_maturity
            && self.catalog.base_url == default_maturity.catalog_base()
        {
            self.catalog.base_url = self.maturity.catalog_base().to_string();
        }
        self
    }

    /// Defaults with the catalog host of `maturity`
    pub fn for_maturity(maturity: Maturity) -> Self {
        let mut config = Config::default();
        config.maturity = maturity;
        config.catalog.base_url = maturity.catalog_base().to_string();
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            maturity: Maturity::default(),
            catalog: CatalogConfig::default(),
            query: QueryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            base_url: default_catalog_base(),
            search_path: default_search_path(),
            health_path: default_health_path(),
            client_id: default_client_id(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            provider: default_provider(),
            default_page_size: default_page_size(),
            time_budget_ms: default_time_budget_ms(),
            list_exempt_filters: default_list_exempt_filters(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}
