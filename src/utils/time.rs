//! Time utilities: parsing HH:MM and minute-of-day arithmetic.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, Timelike};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

pub fn parse_required_time(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<NaiveTime>> {
    input.map(|s| parse_required_time(s)).transpose()
}

pub fn minutes_of_day(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

/// Inverse of `minutes_of_day`; `None` outside `0..1440`.
pub fn time_from_minutes(mins: i64) -> Option<NaiveTime> {
    if !(0..24 * 60).contains(&mins) {
        return None;
    }
    NaiveTime::from_hms_opt((mins / 60) as u32, (mins % 60) as u32, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_round_trip() {
        let t = parse_time("06:45").unwrap();
        assert_eq!(minutes_of_day(t), 405);
        assert_eq!(time_from_minutes(405), Some(t));
        assert_eq!(time_from_minutes(24 * 60), None);
        assert_eq!(time_from_minutes(-1), None);
    }

    #[test]
    fn rejects_bad_times() {
        assert!(parse_time("25:00").is_none());
        assert!(parse_required_time("noon").is_err());
        assert_eq!(parse_optional_time(None).unwrap(), None);
    }
}
