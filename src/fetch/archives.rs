use log::debug;
use reqwest::StatusCode;

use crate::error::AppError;
use crate::records::Period;

use super::decode::{parse_archive_periods, ArchivesPayload};
use super::{Endpoints, FetchResult, Transport};

/// Lists the months for which a player has archived games.
pub struct ArchiveLister<'a, T> {
    transport: &'a T,
    endpoints: &'a Endpoints,
}

impl<'a, T: Transport> ArchiveLister<'a, T> {
    pub fn new(transport: &'a T, endpoints: &'a Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Periods in ascending order. An empty list is a valid answer, not an error.
    pub async fn list_periods(&self, username: &str) -> FetchResult<Vec<Period>> {
        let response = self
            .transport
            .get(&self.endpoints.archives(username))
            .await?;

        match response.status {
            status if status.is_success() => {
                let payload: ArchivesPayload = response.json()?;
                let periods = parse_archive_periods(&payload.archives)?;
                debug!("{} archived months for {username}", periods.len());
                Ok(periods)
            }
            StatusCode::NOT_FOUND => Err(AppError::NotFound),
            status => Err(AppError::upstream_status(status)),
        }
    }
}
