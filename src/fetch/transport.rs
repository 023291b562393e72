use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::config::{HttpConfig, RetryConfig};
use crate::error::{AppError, Context};

use super::{decode, FetchResult};

/// Statuses treated as transient and retried with backoff.
pub const RETRYABLE_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
    pub retry_after: Option<Duration>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> FetchResult<T> {
        decode::parse_json(&self.body)
    }
}

/// Read-only GET access to the upstream API, shared by every fetcher.
///
/// Implementations own their retry policy: a returned `Ok` carries the final
/// status after transient failures were retried, and `Err` means the request
/// could not be completed at all.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = FetchResult<HttpResponse>> + Send;
}

/// Pooled reqwest client with a fixed timeout, user agent and retry policy.
pub struct HttpTransport {
    client: Client,
    retry: RetryConfig,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .context("Failed to construct HTTP client")?;

        Ok(Self {
            client,
            retry: config.retry.clone(),
        })
    }

    async fn get_once(&self, url: &str) -> FetchResult<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AppError::network)?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.map_err(AppError::network)?;
        debug!("GET {url} -> {status}");

        Ok(HttpResponse {
            status,
            body,
            retry_after,
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> FetchResult<HttpResponse> {
        send_with_retry(&self.retry, url, || self.get_once(url)).await
    }
}

pub fn is_retryable(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Delay before retry number `retry` (1-based): `base * 2^(retry - 1)`, or the
/// server's `Retry-After` hint when that is longer (capped).
pub fn backoff_delay(policy: &RetryConfig, retry: u32, hint: Option<Duration>) -> Duration {
    let exponent = retry.saturating_sub(1).min(16);
    let backoff = policy.backoff_base.saturating_mul(1 << exponent);
    match hint {
        Some(hint) => backoff.max(hint.min(policy.retry_after_cap)),
        None => backoff,
    }
}

/// Drive `attempt` until it yields a non-retryable response or the retry budget runs out.
pub(crate) async fn send_with_retry<F, Fut>(
    policy: &RetryConfig,
    url: &str,
    mut attempt: F,
) -> FetchResult<HttpResponse>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FetchResult<HttpResponse>>,
{
    let attempts = policy.max_retries + 1;
    let mut retries = 0;

    loop {
        let (failure, hint) = match attempt().await {
            Ok(response) if !is_retryable(response.status) => return Ok(response),
            Ok(response) => (
                AppError::Network(format!(
                    "Network error: upstream returned {} after {attempts} attempts",
                    response.status
                )),
                response.retry_after,
            ),
            Err(err @ AppError::Network(_)) => (err, None),
            Err(err) => return Err(err),
        };

        if retries >= policy.max_retries {
            return Err(failure);
        }

        retries += 1;
        let delay = backoff_delay(policy, retries, hint);
        warn!(
            "Retrying {url} in {}ms (attempt {}/{attempts})",
            delay.as_millis(),
            retries + 1
        );
        sleep(delay).await;
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
