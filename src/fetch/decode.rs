use serde::{de::DeserializeOwned, Deserialize};

use crate::error::AppError;
use crate::records::Period;

use super::FetchResult;

/// Subset of the public player profile; only its presence matters to the pipeline.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PlayerProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub player_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArchivesPayload {
    #[serde(default)]
    pub archives: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GamesPayload {
    #[serde(default)]
    pub games: Vec<RawGameRecord>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct PlayerSide {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub rating: Option<i64>,
}

/// One archived game as served upstream. Fields the pipeline does not read are ignored.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct RawGameRecord {
    #[serde(default)]
    pub white: Option<PlayerSide>,
    #[serde(default)]
    pub black: Option<PlayerSide>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub time_class: Option<String>,
}

impl RawGameRecord {
    pub fn is_time_class(&self, class: &str) -> bool {
        self.time_class.as_deref() == Some(class)
    }
}

pub fn parse_json<T: DeserializeOwned>(body: &str) -> FetchResult<T> {
    Ok(serde_json::from_str(body)?)
}

/// Turn archive URLs of the form `.../games/{year}/{month}` into ordered, unique periods.
pub fn parse_archive_periods(archives: &[String]) -> FetchResult<Vec<Period>> {
    let mut periods = archives
        .iter()
        .map(|url| parse_archive_url(url))
        .collect::<FetchResult<Vec<_>>>()?;

    periods.sort();
    periods.dedup();
    Ok(periods)
}

fn parse_archive_url(url: &str) -> FetchResult<Period> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let month = segments.next().and_then(|s| s.parse::<u32>().ok());
    let year = segments.next().and_then(|s| s.parse::<i32>().ok());

    match (year, month) {
        (Some(year), Some(month)) => Period::new(year, month)
            .ok_or_else(|| AppError::malformed(format!("archive month out of range in `{url}`"))),
        _ => Err(AppError::malformed(format!(
            "archive url `{url}` does not end in /year/month"
        ))),
    }
}
