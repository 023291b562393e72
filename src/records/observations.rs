use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::config::CalendarZone;
use crate::error::{AppError, Result};
use crate::fetch::RawGameRecord;

use super::RatingObservation;

/// Map games to the queried player's post-game rating.
///
/// The side is picked by case-insensitive username match on white, otherwise black;
/// games are assumed to involve the player. Games without a positive `end_time` are skipped and
/// a missing rating reads as 0. A game lacking the chosen side entirely is malformed.
pub fn extract_observations(
    records: &[RawGameRecord],
    username: &str,
    calendar: CalendarZone,
) -> Result<Vec<RatingObservation>> {
    let username_lower = username.to_lowercase();
    let mut observations = Vec::with_capacity(records.len());

    for record in records {
        let plays_white = record
            .white
            .as_ref()
            .is_some_and(|side| side.username.to_lowercase() == username_lower);

        let side = if plays_white {
            record.white.as_ref()
        } else {
            record.black.as_ref()
        };

        let Some(end_time) = record.end_time.filter(|t| *t > 0) else {
            continue;
        };

        let side = side.ok_or_else(|| {
            AppError::malformed(format!("game ending at {end_time} has no player side"))
        })?;

        let timestamp = DateTime::<Utc>::from_timestamp(end_time, 0).ok_or_else(|| {
            AppError::malformed(format!("end_time {end_time} is out of range"))
        })?;

        observations.push(RatingObservation {
            date: calendar_date(timestamp, calendar),
            timestamp,
            rating: side.rating.unwrap_or(0),
        });
    }

    Ok(observations)
}

fn calendar_date(timestamp: DateTime<Utc>, calendar: CalendarZone) -> NaiveDate {
    match calendar {
        CalendarZone::Utc => timestamp.date_naive(),
        CalendarZone::Local => timestamp.with_timezone(&Local).date_naive(),
    }
}
