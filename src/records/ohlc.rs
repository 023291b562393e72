use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{AppError, Result};

use super::{DailyBar, RatingObservation};

/// Build one bar per calendar day from the first to the last observed date.
///
/// Days without games repeat the previous day's close in all four fields.
pub fn aggregate_daily(observations: &[RatingObservation]) -> Result<Vec<DailyBar>> {
    let mut sorted: Vec<&RatingObservation> = observations.iter().collect();
    // Rating breaks timestamp ties so the output is independent of input order.
    sorted.sort_by_key(|obs| (obs.timestamp, obs.rating));

    let mut grouped: BTreeMap<NaiveDate, DailyBar> = BTreeMap::new();
    for obs in sorted {
        grouped
            .entry(obs.date)
            .and_modify(|bar| {
                bar.high = bar.high.max(obs.rating);
                bar.low = bar.low.min(obs.rating);
                bar.close = obs.rating;
            })
            .or_insert_with(|| DailyBar::flat(obs.date, obs.rating));
    }

    let (Some(first), Some(last)) = (
        grouped.keys().next().copied(),
        grouped.keys().next_back().copied(),
    ) else {
        return Err(AppError::empty("no rating observations to aggregate"));
    };

    let mut bars = Vec::with_capacity(grouped.len());
    let mut previous_close = None;
    for date in first.iter_days().take_while(|date| *date <= last) {
        let bar = match (grouped.get(&date), previous_close) {
            (Some(bar), _) => *bar,
            (None, Some(close)) => DailyBar::flat(date, close),
            // The first day is the earliest observed date, so it always has a bar.
            (None, None) => continue,
        };
        previous_close = Some(bar.close);
        bars.push(bar);
    }

    Ok(bars)
}
