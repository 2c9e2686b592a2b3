//! Row mappers and statements, one module per table.
//!
//! Every function takes a plain `&Connection`, so callers can pass either the
//! pool connection or an open `Transaction`.

pub mod benefit_types;
pub mod bookings;
pub mod memberships;
pub mod settings;
pub mod slots;
pub mod usage;

use crate::errors::AppError;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Row;
use rusqlite::types::Type;

pub(crate) const DATE_FMT: &str = "%Y-%m-%d";
pub(crate) const TIME_FMT: &str = "%H:%M";

fn conversion_failure(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn date_col(row: &Row, name: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(name)?;
    NaiveDate::parse_from_str(&raw, DATE_FMT)
        .map_err(|_| conversion_failure(0, AppError::InvalidDate(raw.clone())))
}

pub(crate) fn opt_date_col(row: &Row, name: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(name)?;
    raw.map(|s| {
        NaiveDate::parse_from_str(&s, DATE_FMT)
            .map_err(|_| conversion_failure(0, AppError::InvalidDate(s.clone())))
    })
    .transpose()
}

pub(crate) fn time_col(row: &Row, name: &str) -> rusqlite::Result<NaiveTime> {
    let raw: String = row.get(name)?;
    NaiveTime::parse_from_str(&raw, TIME_FMT)
        .map_err(|_| conversion_failure(0, AppError::InvalidTime(raw.clone())))
}

pub(crate) fn enum_col<T>(
    row: &Row,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(name)?;
    parse(&raw).ok_or_else(|| conversion_failure(0, AppError::InvalidStatus(raw.clone())))
}

pub(crate) fn fmt_date(d: &NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

pub(crate) fn fmt_time(t: &NaiveTime) -> String {
    t.format(TIME_FMT).to_string()
}
