//! Runtime configuration read from the environment (and `.env`)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{LottoForgeError, Result};
use crate::types::DEFAULT_MAX_ATTEMPTS;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Cached draw history (refreshed daily)
    pub history_file: PathBuf,
    /// Cached frequency ranking (refreshed weekly)
    pub top_numbers_file: PathBuf,
    /// Lottery site root
    pub base_url: String,
    /// How many recent draws to fetch on refresh
    pub history_depth: u32,
    /// Size of the ranked pool used for frequency picks
    pub top_pool_size: usize,
    /// Samples allowed per accepted combination
    pub max_attempts: u64,
    /// In-flight draw requests
    pub fetch_concurrency: usize,
    /// Pause after each draw request
    pub request_delay: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from("lotto_history.json"),
            top_numbers_file: PathBuf::from("top_numbers.json"),
            base_url: "https://www.dhlottery.co.kr".to_string(),
            history_depth: 100,
            top_pool_size: 20,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            fetch_concurrency: 4,
            request_delay: Duration::from_millis(200),
            timeout: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `LOTTO_*` environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            history_file: env::var("LOTTO_HISTORY_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_file),
            top_numbers_file: env::var("LOTTO_TOP_NUMBERS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.top_numbers_file),
            base_url: env::var("LOTTO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            history_depth: env_parse("LOTTO_HISTORY_DEPTH")?.unwrap_or(defaults.history_depth),
            top_pool_size: env_parse("LOTTO_TOP_POOL_SIZE")?.unwrap_or(defaults.top_pool_size),
            max_attempts: env_parse("LOTTO_MAX_ATTEMPTS")?.unwrap_or(defaults.max_attempts),
            fetch_concurrency: env_parse("LOTTO_FETCH_CONCURRENCY")?
                .unwrap_or(defaults.fetch_concurrency),
            request_delay: env_parse("LOTTO_REQUEST_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_delay),
            timeout: env_parse("LOTTO_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_depth == 0 {
            return Err(LottoForgeError::config("LOTTO_HISTORY_DEPTH must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(LottoForgeError::config("LOTTO_MAX_ATTEMPTS must be at least 1"));
        }
        if self.fetch_concurrency == 0 {
            return Err(LottoForgeError::config("LOTTO_FETCH_CONCURRENCY must be at least 1"));
        }
        if self.base_url.is_empty() {
            return Err(LottoForgeError::config("LOTTO_BASE_URL must not be empty"));
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| crate::config_error!("{} has an invalid value: '{}'", key, raw)),
        Err(_) => Ok(None),
    }
}
