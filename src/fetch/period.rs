use log::{debug, warn};
use reqwest::StatusCode;

use crate::error::AppError;
use crate::records::{Mode, Period};

use super::decode::{GamesPayload, RawGameRecord};
use super::{Endpoints, FetchResult, Transport};

/// One month of games to download for one player and mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub username: String,
    pub period: Period,
    pub mode: Mode,
}

/// Downloads a single month of games and keeps the requested mode only.
pub struct PeriodFetcher<'a, T> {
    transport: &'a T,
    endpoints: &'a Endpoints,
}

impl<'a, T: Transport> PeriodFetcher<'a, T> {
    pub fn new(transport: &'a T, endpoints: &'a Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Never fails: a missing month is empty, and any other failure is logged and
    /// contributes no games so one bad month cannot sink the whole chart.
    pub async fn fetch(&self, task: &FetchTask) -> Vec<RawGameRecord> {
        match self.try_fetch(task).await {
            Ok(games) => games,
            Err(err) => {
                warn!(
                    "Skipping {}/{} ({}): {err}",
                    task.username, task.period, task.mode
                );
                Vec::new()
            }
        }
    }

    pub async fn try_fetch(&self, task: &FetchTask) -> FetchResult<Vec<RawGameRecord>> {
        let url = self.endpoints.period(&task.username, task.period);
        let response = self.transport.get(&url).await?;

        match response.status {
            status if status.is_success() => {
                let payload: GamesPayload = response.json()?;
                let total = payload.games.len();
                let games: Vec<RawGameRecord> = payload
                    .games
                    .into_iter()
                    .filter(|game| game.is_time_class(task.mode.as_str()))
                    .collect();
                debug!(
                    "{}/{}: kept {} of {total} games",
                    task.username,
                    task.period,
                    games.len()
                );
                Ok(games)
            }
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status => Err(AppError::upstream_status(status)),
        }
    }
}
