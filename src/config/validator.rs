use crate::error::{AppError, Result};

use super::{Config, HttpConfig};

/// Validate loaded settings and surface every problem in one message.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_http(&config.http, &mut issues);

    if config.concurrency_limit == 0 {
        issues.push("concurrency_limit must be at least 1".to_string());
    }
    if config.cache.profile_capacity == 0 {
        issues.push("profile_cache_capacity must be at least 1".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_http(http: &HttpConfig, issues: &mut Vec<String>) {
    let base = http.api_base_url.trim();
    if base.is_empty() {
        issues.push("api_base_url must not be empty".to_string());
    } else if !(base.starts_with("http://") || base.starts_with("https://")) {
        issues.push(format!("api_base_url `{base}` must use http or https"));
    }

    if http.user_agent.trim().is_empty() {
        issues.push("user_agent must not be empty".to_string());
    }

    if http.timeout.is_zero() {
        issues.push("request_timeout_secs must be greater than zero".to_string());
    }
}
