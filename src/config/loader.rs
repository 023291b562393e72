use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{AppError, Context, Result};

use super::{validator, CalendarZone, Config};

/// Load settings from a JSON file, falling back to built-in values for every absent key.
pub fn load_config(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config JSON at {}", path.display()))?;

    parse_config(&json).map_err(|err| match err {
        AppError::Json(err) => AppError::message(format!(
            "failed to parse config JSON at {}: {err}",
            path.display()
        )),
        other => other,
    })
}

pub(crate) fn parse_config(json: &str) -> Result<Config> {
    let raw: RawConfig = serde_json::from_str(json)?;
    let config = raw.into_config();
    validator::validate_config(&config)?;
    Ok(config)
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    api_base_url: Option<String>,
    user_agent: Option<String>,
    request_timeout_secs: Option<u64>,
    pool_max_idle_per_host: Option<usize>,
    max_retries: Option<u32>,
    backoff_base_ms: Option<u64>,
    concurrency_limit: Option<usize>,
    result_ttl_secs: Option<u64>,
    profile_cache_capacity: Option<usize>,
    calendar: Option<CalendarZone>,
}

impl RawConfig {
    fn into_config(self) -> Config {
        let mut config = Config::builtin();

        if let Some(url) = self.api_base_url {
            config.http.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(agent) = self.user_agent {
            config.http.user_agent = agent;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.http.timeout = Duration::from_secs(secs);
        }
        if let Some(size) = self.pool_max_idle_per_host {
            config.http.pool_max_idle_per_host = size;
        }
        if let Some(retries) = self.max_retries {
            config.http.retry.max_retries = retries;
        }
        if let Some(ms) = self.backoff_base_ms {
            config.http.retry.backoff_base = Duration::from_millis(ms);
        }
        if let Some(limit) = self.concurrency_limit {
            config.concurrency_limit = limit;
        }
        if let Some(secs) = self.result_ttl_secs {
            config.cache.result_ttl = Duration::from_secs(secs);
        }
        if let Some(capacity) = self.profile_cache_capacity {
            config.cache.profile_capacity = capacity;
        }
        if let Some(calendar) = self.calendar {
            config.calendar = calendar;
        }

        config
    }
}
