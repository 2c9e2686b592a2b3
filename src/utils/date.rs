use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn parse_required_date(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Every calendar date in `[from, to]`, inclusive.
pub fn dates_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|d| *d <= to).collect()
}

/// Resolve a period expression to inclusive date bounds.
///
/// Accepted: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or `START:END` using any of them.
pub fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start, end)) = p.split_once(':') {
        let (s, _) = single_period_bounds(start)?;
        let (_, e) = single_period_bounds(end)?;
        if e < s {
            return Err(AppError::InvalidDate(format!("Empty range: {}", p)));
        }
        return Ok((s, e));
    }
    single_period_bounds(p)
}

fn single_period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let p = p.trim();

    // YYYY-MM-DD
    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    // YYYY-MM
    if let Ok(first) = NaiveDate::parse_from_str(&format!("{}-01", p), "%Y-%m-%d") {
        return Ok((first, last_day_of_month(first.year(), first.month())?));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
    {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::InvalidDate(p.to_string()))?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::InvalidDate(p.to_string()))?;
        return Ok((first, last));
    }

    Err(AppError::InvalidDate(format!("Invalid period: {}", p)))
}

fn last_day_of_month(year: i32, month: u32) -> AppResult<NaiveDate> {
    let (y, m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AppError::InvalidDate(format!("{}-{:02}", year, month)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn dates_between_is_inclusive() {
        let v = dates_between(d(2025, 2, 27), d(2025, 3, 2));
        assert_eq!(v, vec![d(2025, 2, 27), d(2025, 2, 28), d(2025, 3, 1), d(2025, 3, 2)]);
        assert!(dates_between(d(2025, 3, 2), d(2025, 3, 1)).is_empty());
    }

    #[test]
    fn period_forms() {
        assert_eq!(period_bounds("2025-09-15").unwrap(), (d(2025, 9, 15), d(2025, 9, 15)));
        assert_eq!(period_bounds("2025-09").unwrap(), (d(2025, 9, 1), d(2025, 9, 30)));
        assert_eq!(period_bounds("2024").unwrap(), (d(2024, 1, 1), d(2024, 12, 31)));
        assert_eq!(
            period_bounds("2024-11:2025-01").unwrap(),
            (d(2024, 11, 1), d(2025, 1, 31))
        );
        assert!(period_bounds("2025-02:2024-01").is_err());
        assert!(period_bounds("soon").is_err());
    }
}
