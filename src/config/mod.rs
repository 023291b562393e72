use std::time::Duration;

use serde::Deserialize;

pub mod loader;
pub mod validator;

pub use loader::load_config;

pub const DEFAULT_API_BASE_URL: &str = "https://api.chess.com/pub/player";
pub const DEFAULT_USER_AGENT: &str = "ChessTracker/1.0";

/// Which calendar decides the day a game belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalendarZone {
    #[default]
    Local,
    Utc,
}

/// Retry behaviour applied by the transport to transient failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub retry_after_cap: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_millis(300),
            retry_after_cap: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub api_base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub result_ttl: Duration,
    pub profile_capacity: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub concurrency_limit: usize,
    pub calendar: CalendarZone,
}

impl Config {
    pub fn builtin() -> Self {
        Config {
            http: HttpConfig {
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
                timeout: Duration::from_secs(10),
                pool_max_idle_per_host: 20,
                retry: RetryConfig::default(),
            },
            cache: CacheConfig {
                result_ttl: Duration::from_secs(300),
                profile_capacity: 128,
            },
            concurrency_limit: crate::fetch::PERIOD_CONCURRENCY_LIMIT,
            calendar: CalendarZone::Local,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::builtin()
    }
}
