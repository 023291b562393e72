use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};
use tokio::sync::Semaphore;

use crate::records::{Mode, Period};

use super::decode::RawGameRecord;
use super::period::{FetchTask, PeriodFetcher};
use super::{ensure_concurrency_limit, Endpoints, Transport, PERIOD_CONCURRENCY_LIMIT};

/// Fans month downloads out under a fixed in-flight bound and merges the results.
///
/// Every month runs as its own spawned task, so a caller that stops waiting
/// detaches the downloads instead of cancelling them.
pub struct FetchScheduler<T> {
    transport: Arc<T>,
    endpoints: Arc<Endpoints>,
    concurrency_limit: usize,
}

impl<T: Transport + 'static> FetchScheduler<T> {
    pub fn new(transport: Arc<T>, endpoints: Arc<Endpoints>) -> Self {
        Self::with_concurrency_limit(transport, endpoints, PERIOD_CONCURRENCY_LIMIT)
    }

    pub fn with_concurrency_limit(
        transport: Arc<T>,
        endpoints: Arc<Endpoints>,
        concurrency_limit: usize,
    ) -> Self {
        Self {
            transport,
            endpoints,
            concurrency_limit: ensure_concurrency_limit(concurrency_limit),
        }
    }

    /// Returns once every task has finished. Failed months contribute nothing, so
    /// the worst case is an empty collection rather than an error.
    pub async fn fetch_all(
        &self,
        username: &str,
        periods: &[Period],
        mode: Mode,
    ) -> Vec<RawGameRecord> {
        let permits = Arc::new(Semaphore::new(self.concurrency_limit));
        let handles: Vec<_> = periods
            .iter()
            .map(|period| {
                let task = FetchTask {
                    username: username.to_string(),
                    period: *period,
                    mode,
                };
                let transport = Arc::clone(&self.transport);
                let endpoints = Arc::clone(&self.endpoints);
                let permits = Arc::clone(&permits);
                tokio::spawn(async move {
                    // The semaphore is never closed.
                    let Ok(_permit) = permits.acquire_owned().await else {
                        return Vec::new();
                    };
                    PeriodFetcher::new(transport.as_ref(), endpoints.as_ref())
                        .fetch(&task)
                        .await
                })
            })
            .collect();

        let mut games = Vec::new();
        for joined in join_all(handles).await {
            match joined {
                Ok(batch) => games.extend(batch),
                Err(err) => warn!("Month task for {username} did not finish: {err}"),
            }
        }

        info!(
            "Fetched {} {mode} games across {} months for {username}",
            games.len(),
            periods.len()
        );
        games
    }
}
