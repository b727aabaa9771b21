//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PESTMATCH_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_KB_PATH, DEFAULT_MAX_RESULTS, DEFAULT_PAGE_SIZE,
};

/// Matcher configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PESTMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Knowledge-base export (DynamoDB typed JSON). Default: `./data/disease_kb.json`.
    pub kb_path: PathBuf,

    /// Maximum snapshot age before a reload. Default: 300 seconds.
    pub cache_ttl: Duration,

    /// Ranked matches returned per query. Default: `5`.
    pub max_results: usize,

    /// Items per scan page for the file-backed store. Default: `100`.
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kb_path: PathBuf::from(DEFAULT_KB_PATH),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            max_results: DEFAULT_MAX_RESULTS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    const ENV_KB_PATH: &'static str = "PESTMATCH_KB_PATH";
    const ENV_CACHE_TTL_SECS: &'static str = "PESTMATCH_CACHE_TTL_SECS";
    const ENV_MAX_RESULTS: &'static str = "PESTMATCH_MAX_RESULTS";
    const ENV_PAGE_SIZE: &'static str = "PESTMATCH_PAGE_SIZE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let kb_path = Self::parse_path_from_env(Self::ENV_KB_PATH, defaults.kb_path);
        let cache_ttl = Self::parse_u64_from_env(
            Self::ENV_CACHE_TTL_SECS,
            defaults.cache_ttl.as_secs(),
        )
        .map(Duration::from_secs)?;
        let max_results = Self::parse_u64_from_env(
            Self::ENV_MAX_RESULTS,
            defaults.max_results as u64,
        )? as usize;
        let page_size =
            Self::parse_u64_from_env(Self::ENV_PAGE_SIZE, defaults.page_size as u64)? as usize;

        Ok(Self {
            kb_path,
            cache_ttl,
            max_results,
            page_size,
        })
    }

    /// Validates the knowledge-base path and rejects zero-valued limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.kb_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.kb_path.clone(),
            });
        }
        if !self.kb_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.kb_path.clone(),
            });
        }

        if self.cache_ttl.is_zero() {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_CACHE_TTL_SECS,
            });
        }
        if self.max_results == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_MAX_RESULTS,
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_PAGE_SIZE,
            });
        }

        Ok(())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }
}
