use super::fmt_date;
use crate::errors::AppResult;
use crate::models::usage::BenefitUsage;
use chrono::NaiveDate;
use rusqlite::{Connection, params};

pub fn insert_usage(conn: &Connection, u: &BenefitUsage) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO benefit_usage
         (membership_id, benefit_type_id, used_on, booking_id, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            u.membership_id,
            u.benefit_type_id,
            fmt_date(&u.used_on),
            u.booking_id,
            u.source,
            u.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Uses recorded inside `bounds` (inclusive), or ever when `bounds` is `None`.
pub fn count_usage(
    conn: &Connection,
    membership_id: i64,
    benefit_type_id: i64,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<i64> {
    let (from, to) = match bounds {
        Some((f, t)) => (Some(fmt_date(&f)), Some(fmt_date(&t))),
        None => (None, None),
    };

    let n = conn.query_row(
        "SELECT COUNT(*) FROM benefit_usage
         WHERE membership_id = ?1 AND benefit_type_id = ?2
           AND (?3 IS NULL OR used_on >= ?3)
           AND (?4 IS NULL OR used_on <= ?4)",
        params![membership_id, benefit_type_id, from, to],
        |row| row.get(0),
    )?;
    Ok(n)
}
