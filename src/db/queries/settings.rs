use super::{fmt_time, time_col};
use crate::errors::{AppError, AppResult};
use crate::models::settings::BenefitSettings;
use crate::models::weekdays::Weekdays;
use chrono::Local;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<BenefitSettings> {
    let days_raw: String = row.get("active_days")?;
    let active_days = Weekdays::from_db_str(&days_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
    })?;

    Ok(BenefitSettings {
        id: row.get("id")?,
        branch_id: row.get("branch_id")?,
        benefit_type_id: row.get("benefit_type_id")?,
        capacity: row.get("capacity")?,
        slot_minutes: row.get("slot_minutes")?,
        open_time: time_col(row, "open_time")?,
        close_time: time_col(row, "close_time")?,
        active_days,
        updated_at: row.get("updated_at")?,
    })
}

/// Settings row for exactly this scope (`None` = branch default).
pub fn find_scoped(
    conn: &Connection,
    branch_id: &str,
    benefit_type_id: Option<i64>,
) -> AppResult<Option<BenefitSettings>> {
    let found = conn
        .query_row(
            "SELECT * FROM benefit_settings
             WHERE branch_id = ?1 AND IFNULL(benefit_type_id, 0) = IFNULL(?2, 0)",
            params![branch_id, benefit_type_id],
            map_row,
        )
        .optional()?;
    Ok(found)
}

/// Effective settings for a benefit: its own row first, then the branch default.
pub fn resolve(
    conn: &Connection,
    branch_id: &str,
    benefit_type_id: i64,
) -> AppResult<Option<BenefitSettings>> {
    if let Some(s) = find_scoped(conn, branch_id, Some(benefit_type_id))? {
        return Ok(Some(s));
    }
    find_scoped(conn, branch_id, None)
}

/// Insert or replace the settings for `(branch_id, benefit_type_id)`.
/// Returns the row id.
pub fn upsert(conn: &Connection, s: &BenefitSettings) -> AppResult<i64> {
    s.validate()?;
    let now = Local::now().to_rfc3339();

    match find_scoped(conn, &s.branch_id, s.benefit_type_id)? {
        Some(existing) => {
            conn.execute(
                "UPDATE benefit_settings
                 SET capacity = ?1, slot_minutes = ?2, open_time = ?3,
                     close_time = ?4, active_days = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    s.capacity,
                    s.slot_minutes,
                    fmt_time(&s.open_time),
                    fmt_time(&s.close_time),
                    s.active_days.to_db_string(),
                    now,
                    existing.id,
                ],
            )?;
            Ok(existing.id)
        }
        None => {
            conn.execute(
                "INSERT INTO benefit_settings
                 (branch_id, benefit_type_id, capacity, slot_minutes,
                  open_time, close_time, active_days, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    s.branch_id,
                    s.benefit_type_id,
                    s.capacity,
                    s.slot_minutes,
                    fmt_time(&s.open_time),
                    fmt_time(&s.close_time),
                    s.active_days.to_db_string(),
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        }
    }
}

pub fn list_for_branch(conn: &Connection, branch_id: &str) -> AppResult<Vec<BenefitSettings>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM benefit_settings
         WHERE branch_id = ?1
         ORDER BY IFNULL(benefit_type_id, 0) ASC",
    )?;
    let rows = stmt.query_map([branch_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Effective settings or `SettingsNotFound`.
pub fn require_resolved(
    conn: &Connection,
    branch_id: &str,
    benefit_type_id: i64,
    benefit_code: &str,
) -> AppResult<BenefitSettings> {
    resolve(conn, branch_id, benefit_type_id)?.ok_or_else(|| AppError::SettingsNotFound {
        branch: branch_id.to_string(),
        benefit: benefit_code.to_string(),
    })
}
