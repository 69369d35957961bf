//! TOML configuration for the cache, the catalog and the provider.
//!
//! ```toml
//! cache_dir = "~/.cache/stock_cache"
//! catalog_path = "./data/symbols_ns.csv"
//! period = "1y"
//! exchange_suffix = ".NS"
//! max_age_secs = 86400
//!
//! [provider]
//! kind = "yahoo"
//! requests_per_second = 2
//! ```
//!
//! Everything except `catalog_path` has a default.

use std::{fs, path::{Path, PathBuf}, time::Duration};

use serde::{Deserialize, Serialize};
use shared_utils::env::get_env_var;
use tracing::error;

use crate::{
    cache::CachePolicy,
    errors::Error,
    models::{period::Period, ticker::DEFAULT_EXCHANGE_SUFFIX},
};

/// Environment variable consulted when no `--config` is given.
pub const CONFIG_ENV_VAR: &str = "STOCK_CACHE_CONFIG";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// CSV with a `Symbol` column listing the selectable tickers.
    pub catalog_path: PathBuf,

    #[serde(default)]
    pub period: Period,

    #[serde(default = "default_exchange_suffix")]
    pub exchange_suffix: String,

    /// Snapshots older than this are re-fetched. Absent: snapshots never expire.
    #[serde(default)]
    pub max_age_secs: Option<u64>,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Which upstream to use (serde snake_case).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// Yahoo Finance chart API.
    #[default]
    Yahoo,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub kind: ProviderId,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Zero is treated as one.
    pub requests_per_second: u32,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderId::Yahoo,
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            requests_per_second: 2,
            user_agent: concat!("Mozilla/5.0 (compatible; stock_cache/", env!("CARGO_PKG_VERSION"), ")")
                .to_string(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("~/.cache/stock_cache")
}

fn default_exchange_suffix() -> String {
    DEFAULT_EXCHANGE_SUFFIX.to_string()
}

impl Config {
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            max_age: self.max_age_secs.map(Duration::from_secs),
        }
    }
}

pub fn parse_config(text: &str) -> Result<Config, Error> {
    toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
}

pub fn read_config(config_path: impl AsRef<Path>) -> Result<Config, Error> {
    let config_path = config_path.as_ref();
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            error!(path = %config_path.display(), "Failed to read config file: {e}");
            return Err(Error::Config(format!(
                "cannot read {}: {e}",
                config_path.display()
            )));
        }
    };

    match parse_config(&content) {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            error!(path = %config_path.display(), "Failed to parse config file: {e}");
            Err(e)
        }
    }
}

/// The explicit path if given, else the path named by [`CONFIG_ENV_VAR`].
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, Error> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(PathBuf::from(get_env_var(CONFIG_ENV_VAR)?)),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(r#"catalog_path = "data/symbols.csv""#).unwrap();
        assert_eq!(cfg.catalog_path, PathBuf::from("data/symbols.csv"));
        assert_eq!(cfg.cache_dir, PathBuf::from("~/.cache/stock_cache"));
        assert_eq!(cfg.period.as_str(), "1y");
        assert_eq!(cfg.exchange_suffix, ".NS");
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.cache_policy(), CachePolicy::presence_only());
        assert_eq!(cfg.provider.kind, ProviderId::Yahoo);
        assert_eq!(cfg.provider.requests_per_second, 2);
    }

    #[test]
    fn full_config() {
        let cfg = parse_config(
            r#"
            cache_dir = "/srv/stocks"
            catalog_path = "/srv/symbols.csv"
            period = "6mo"
            exchange_suffix = ""
            max_age_secs = 3600
            log_format = "json"

            [provider]
            base_url = "http://127.0.0.1:8080"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.period.as_str(), "6mo");
        assert_eq!(cfg.exchange_suffix, "");
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.cache_policy(), CachePolicy::max_age(Duration::from_secs(3600)));
        assert_eq!(cfg.provider.base_url, "http://127.0.0.1:8080");
        assert_eq!(cfg.provider.timeout_secs, 5);
        assert_eq!(cfg.provider.requests_per_second, 2);
    }

    #[test]
    fn empty_period_and_unknown_keys_are_rejected() {
        assert!(parse_config("catalog_path = \"x\"\nperiod = \"\"").is_err());
        assert!(parse_config("catalog_path = \"x\"\nperiodd = \"1y\"").is_err());
        assert!(matches!(parse_config("cache_dir = \"x\""), Err(Error::Config(_))));
    }

    #[test]
    fn read_config_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "catalog_path = \"c.csv\"\n").unwrap();
        assert_eq!(read_config(file.path()).unwrap().catalog_path, PathBuf::from("c.csv"));
        assert!(matches!(read_config("/definitely/not/here.toml"), Err(Error::Config(_))));
    }

    #[test]
    fn explicit_path_wins() {
        let p = resolve_config_path(Some(PathBuf::from("a.toml"))).unwrap();
        assert_eq!(p, PathBuf::from("a.toml"));
    }
}
