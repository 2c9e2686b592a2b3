use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;

const ALL: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Set of weekdays, stored as a bitmask (bit 0 = Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Weekdays(u8);

fn bit(day: Weekday) -> u8 {
    1 << day.num_days_from_monday()
}

fn short_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

fn parse_day(s: &str) -> Option<Weekday> {
    match s.trim().to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

impl Weekdays {
    pub fn all() -> Self {
        Weekdays(0b0111_1111)
    }

    pub fn none() -> Self {
        Weekdays(0)
    }

    pub fn mon_to_fri() -> Self {
        Weekdays(0b0001_1111)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & bit(day) != 0
    }

    pub fn includes_date(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= bit(day);
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL.into_iter().filter(|d| self.contains(*d))
    }

    /// Parse a weekday set.
    ///
    /// Accepted forms (case-insensitive, combinable with commas):
    /// - `all`, `weekdays`, `weekend`
    /// - single days: `mon`, `tuesday`, ...
    /// - ranges: `mon-fri`, `fri-mon` (wraps around Sunday)
    pub fn parse(input: &str) -> AppResult<Self> {
        let mut set = Weekdays::none();

        for part in input.split(',') {
            let part = part.trim().to_lowercase();
            if part.is_empty() {
                continue;
            }

            match part.as_str() {
                "all" | "daily" => set.0 |= Weekdays::all().0,
                "weekdays" => set.0 |= Weekdays::mon_to_fri().0,
                "weekend" => {
                    set.insert(Weekday::Sat);
                    set.insert(Weekday::Sun);
                }
                _ => {
                    if let Some((from, to)) = part.split_once('-') {
                        let start = parse_day(from)
                            .ok_or_else(|| AppError::InvalidWeekdays(input.to_string()))?;
                        let end = parse_day(to)
                            .ok_or_else(|| AppError::InvalidWeekdays(input.to_string()))?;

                        let mut day = start;
                        loop {
                            set.insert(day);
                            if day == end {
                                break;
                            }
                            day = day.succ();
                        }
                    } else {
                        let day = parse_day(&part)
                            .ok_or_else(|| AppError::InvalidWeekdays(input.to_string()))?;
                        set.insert(day);
                    }
                }
            }
        }

        if set.is_empty() {
            return Err(AppError::InvalidWeekdays(input.to_string()));
        }

        Ok(set)
    }

    /// Convert enum → DB string (`mon,tue,...`)
    pub fn to_db_string(&self) -> String {
        self.iter().map(short_name).collect::<Vec<_>>().join(",")
    }

    /// Convert DB string → set
    pub fn from_db_str(s: &str) -> AppResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Weekdays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Weekdays::all() {
            write!(f, "all")
        } else {
            write!(f, "{}", self.to_db_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range_and_list() {
        let set = Weekdays::parse("mon-wed,fri").unwrap();
        assert!(set.contains(Weekday::Mon));
        assert!(set.contains(Weekday::Tue));
        assert!(set.contains(Weekday::Wed));
        assert!(!set.contains(Weekday::Thu));
        assert!(set.contains(Weekday::Fri));
        assert_eq!(set.to_db_string(), "mon,tue,wed,fri");
    }

    #[test]
    fn range_wraps_around_sunday() {
        let set = Weekdays::parse("fri-mon").unwrap();
        assert_eq!(set.to_db_string(), "mon,fri,sat,sun");
    }

    #[test]
    fn named_groups() {
        assert_eq!(Weekdays::parse("weekdays").unwrap(), Weekdays::mon_to_fri());
        assert_eq!(Weekdays::parse("ALL").unwrap(), Weekdays::all());
        assert_eq!(
            Weekdays::parse("weekend").unwrap().to_db_string(),
            "sat,sun"
        );
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!(Weekdays::parse("funday").is_err());
        assert!(Weekdays::parse("mon-xyz").is_err());
        assert!(Weekdays::parse(" , ").is_err());
    }

    #[test]
    fn db_string_round_trips() {
        let set = Weekdays::mon_to_fri();
        assert_eq!(Weekdays::from_db_str(&set.to_db_string()).unwrap(), set);
    }

    #[test]
    fn includes_date_uses_calendar_weekday() {
        // 2025-09-06 is a Saturday
        let sat = NaiveDate::from_ymd_opt(2025, 9, 6).unwrap();
        assert!(!Weekdays::mon_to_fri().includes_date(sat));
        assert!(Weekdays::all().includes_date(sat));
    }
}
