use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub mod observations;
pub mod ohlc;

pub use observations::extract_observations;
pub use ohlc::aggregate_daily;

/// Game-speed category used to filter archived games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Bullet,
    Blitz,
    Rapid,
    Daily,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Bullet, Mode::Blitz, Mode::Rapid, Mode::Daily];

    /// Value of the upstream `time_class` field for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Bullet => "bullet",
            Mode::Blitz => "blitz",
            Mode::Rapid => "rapid",
            Mode::Daily => "daily",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Mode::Bullet => "Bullet",
            Mode::Blitz => "Blitz",
            Mode::Rapid => "Rapid",
            Mode::Daily => "Daily",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim().to_lowercase();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalised)
            .ok_or_else(|| AppError::validation("Invalid time control selected."))
    }
}

/// One calendar month of archived games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.year, self.month)
    }
}

/// A single rating reading taken from the end of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingObservation {
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub rating: i64,
}

/// Open/high/low/close summary of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: i64,
    pub high: i64,
    pub low: i64,
    pub close: i64,
}

impl DailyBar {
    /// A day without games: every field carries the previous close.
    pub fn flat(date: NaiveDate, value: i64) -> Self {
        Self {
            date,
            open: value,
            high: value,
            low: value,
            close: value,
        }
    }
}
