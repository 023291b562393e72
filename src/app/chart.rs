use chrono::NaiveDate;
use serde::Serialize;

use crate::records::{DailyBar, Mode};

/// Renderable daily rating series handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingChart {
    pub username: String,
    pub mode: Mode,
    pub title: String,
    pub bars: Vec<DailyBar>,
}

impl RatingChart {
    pub fn new(username: impl Into<String>, mode: Mode, bars: Vec<DailyBar>) -> Self {
        Self {
            username: username.into(),
            mode,
            title: format!("{} Rating History", mode.title()),
            bars,
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|bar| bar.date).collect()
    }

    pub fn opens(&self) -> Vec<i64> {
        self.bars.iter().map(|bar| bar.open).collect()
    }

    pub fn highs(&self) -> Vec<i64> {
        self.bars.iter().map(|bar| bar.high).collect()
    }

    pub fn lows(&self) -> Vec<i64> {
        self.bars.iter().map(|bar| bar.low).collect()
    }

    pub fn closes(&self) -> Vec<i64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn latest(&self) -> Option<&DailyBar> {
        self.bars.last()
    }
}
