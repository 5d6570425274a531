//! Configuration for the Acemap query agent.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Default OpenAI-compatible completion endpoint.
    pub const LLM_BASE_URL: &str = "https://api.openai.com/v1";

    /// Default completion model.
    pub const LLM_MODEL: &str = "qwen-plus";

    /// Acemap work search endpoint.
    pub const ACEMAP_SEARCH_URL: &str = "https://acemap.info/api/v1/work/search";

    /// Completion request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Search request timeout.
    pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Retries for transient failures.
    pub const MAX_RETRIES: u32 = 2;
}

/// Pipeline policy defaults.
pub mod defaults {
    /// Knowledge graph subset shipped next to the binary.
    pub const VOCAB_PATH: &str = "data/gakg_subset.parquet";

    /// Minimum similarity (0-100) for a grounding correction.
    pub const GROUNDING_THRESHOLD: u8 = 85;

    /// `year_start` used when the user asks for "recent" work.
    pub const RECENT_YEAR_FLOOR: i32 = 2020;

    /// Papers fetched per grounded search.
    pub const SEARCH_LIMIT: usize = 20;

    /// Papers fetched for the unprocessed baseline search.
    pub const BASELINE_LIMIT: usize = 5;
}

/// Agent configuration.
#[derive(Clone)]
pub struct Config {
    /// Completion service API key.
    pub llm_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible completion API.
    pub llm_base_url: String,

    /// Completion model identifier.
    pub llm_model: String,

    /// Knowledge graph dataset used for grounding.
    pub vocab_path: PathBuf,

    /// Grounding similarity threshold (0-100).
    pub grounding_threshold: u8,

    /// Year floor substituted for relative recency.
    pub recent_year_floor: i32,

    /// Acemap search endpoint.
    pub search_api_url: String,

    /// Default number of papers fetched per search.
    pub search_limit: usize,

    /// Completion request timeout.
    pub request_timeout: Duration,

    /// Search request timeout.
    pub search_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Retries for transient HTTP failures.
    pub max_retries: u32,

    /// Search cache TTL.
    pub cache_ttl: Duration,

    /// Maximum search cache size.
    pub cache_max_size: u64,
}

impl Config {
    /// Create a new configuration with an optional completion API key.
    #[must_use]
    pub fn new(llm_api_key: Option<String>) -> Self {
        Self {
            llm_api_key,
            llm_base_url: api::LLM_BASE_URL.to_string(),
            llm_model: api::LLM_MODEL.to_string(),
            vocab_path: PathBuf::from(defaults::VOCAB_PATH),
            grounding_threshold: defaults::GROUNDING_THRESHOLD,
            recent_year_floor: defaults::RECENT_YEAR_FLOOR,
            search_api_url: api::ACEMAP_SEARCH_URL.to_string(),
            search_limit: defaults::SEARCH_LIMIT,
            request_timeout: api::REQUEST_TIMEOUT,
            search_timeout: api::SEARCH_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            max_retries: api::MAX_RETRIES,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
        }
    }

    /// Create a test configuration pointing both services at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            llm_api_key: Some("test-key".to_string()),
            llm_base_url: format!("{}/v1", base_url),
            search_api_url: format!("{}/api/v1/work/search", base_url),
            request_timeout: Duration::from_secs(5),
            search_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_retries: 0,
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
            ..Self::new(None)
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(std::env::var("OPENAI_API_KEY").ok());

        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.llm_base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm_model = model;
        }
        if let Ok(path) = std::env::var("GAKG_PATH") {
            config.vocab_path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("ACEMAP_API_URL") {
            config.search_api_url = url;
        }

        config.grounding_threshold =
            env_or("GROUNDING_THRESHOLD", defaults::GROUNDING_THRESHOLD)?;
        config.recent_year_floor = env_or("RECENT_YEAR_FLOOR", defaults::RECENT_YEAR_FLOOR)?;
        config.search_limit = env_or("SEARCH_LIMIT", defaults::SEARCH_LIMIT)?;

        anyhow::ensure!(
            config.grounding_threshold <= 100,
            "GROUNDING_THRESHOLD must be between 0 and 100, got {}",
            config.grounding_threshold
        );

        Ok(config)
    }

    /// Check if a completion API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.llm_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("has_api_key", &self.has_api_key())
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("vocab_path", &self.vocab_path)
            .field("grounding_threshold", &self.grounding_threshold)
            .field("recent_year_floor", &self.recent_year_floor)
            .field("search_api_url", &self.search_api_url)
            .field("search_limit", &self.search_limit)
            .finish_non_exhaustive()
    }
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().with_context(|| format!("invalid value for {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.llm_api_key.is_none());
        assert!(!config.has_api_key());
        assert_eq!(config.grounding_threshold, 85);
        assert_eq!(config.recent_year_floor, 2020);
        assert_eq!(config.llm_model, "qwen-plus");
    }

    #[test]
    fn test_config_with_api_key() {
        let config = Config::new(Some("test-key".to_string()));
        assert!(config.has_api_key());
        assert_eq!(config.llm_api_key, Some("test-key".to_string()));
    }

    #[test]
    fn test_config_for_testing_points_at_mock() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.llm_base_url, "http://127.0.0.1:9999/v1");
        assert_eq!(config.search_api_url, "http://127.0.0.1:9999/api/v1/work/search");
        assert_eq!(config.cache_max_size, 0);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = Config::new(Some("super-secret".to_string()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("has_api_key"));
    }

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let value: u8 = env_or("ACEMAP_AGENT_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
