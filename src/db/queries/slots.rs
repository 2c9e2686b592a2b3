use super::{date_col, fmt_date, fmt_time, time_col};
use crate::errors::{AppError, AppResult};
use crate::models::slot::BenefitSlot;
use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<BenefitSlot> {
    Ok(BenefitSlot {
        id: row.get("id")?,
        branch_id: row.get("branch_id")?,
        benefit_type_id: row.get("benefit_type_id")?,
        slot_date: date_col(row, "slot_date")?,
        start_time: time_col(row, "start_time")?,
        end_time: time_col(row, "end_time")?,
        capacity: row.get("capacity")?,
        booked_count: row.get("booked_count")?,
        is_active: row.get::<_, i64>("is_active")? == 1,
        created_at: row.get("created_at")?,
    })
}

/// Slots already present for a date, active or not.
pub fn count_for_date(
    conn: &Connection,
    branch_id: &str,
    benefit_type_id: i64,
    date: &NaiveDate,
) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM benefit_slots
         WHERE branch_id = ?1 AND benefit_type_id = ?2 AND slot_date = ?3",
        params![branch_id, benefit_type_id, fmt_date(date)],
        |row| row.get(0),
    )?;
    Ok(n)
}

/// Insert one slot unless the same interval already exists.
/// Returns `true` when a row was created.
pub fn insert_if_absent(
    conn: &Connection,
    branch_id: &str,
    benefit_type_id: i64,
    date: &NaiveDate,
    start: &NaiveTime,
    end: &NaiveTime,
    capacity: i64,
) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO benefit_slots
         (branch_id, benefit_type_id, slot_date, start_time, end_time,
          capacity, booked_count, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7)",
    )?;
    let changed = stmt.execute(params![
        branch_id,
        benefit_type_id,
        fmt_date(date),
        fmt_time(start),
        fmt_time(end),
        capacity,
        Local::now().to_rfc3339(),
    ])?;
    Ok(changed == 1)
}

pub fn find_slot(conn: &Connection, id: i64) -> AppResult<Option<BenefitSlot>> {
    let found = conn
        .query_row("SELECT * FROM benefit_slots WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(found)
}

pub fn require_slot(conn: &Connection, id: i64) -> AppResult<BenefitSlot> {
    find_slot(conn, id)?.ok_or(AppError::SlotNotFound(id))
}

/// Slots of one date, optionally narrowed to a branch and/or benefit type.
pub fn list_for_date(
    conn: &Connection,
    date: &NaiveDate,
    branch_id: Option<&str>,
    benefit_type_id: Option<i64>,
) -> AppResult<Vec<BenefitSlot>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM benefit_slots
         WHERE slot_date = ?1
           AND (?2 IS NULL OR branch_id = ?2)
           AND (?3 IS NULL OR benefit_type_id = ?3)
         ORDER BY branch_id ASC, benefit_type_id ASC, start_time ASC",
    )?;
    let rows = stmt.query_map(params![fmt_date(date), branch_id, benefit_type_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Take one seat only while the slot is active and below capacity.
///
/// The check and the increment are one statement, so two writers can never
/// both take the last seat. Returns `false` when no seat was taken.
pub fn try_take_seat(conn: &Connection, slot_id: i64) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE benefit_slots
         SET booked_count = booked_count + 1
         WHERE id = ?1 AND is_active = 1 AND booked_count < capacity",
        [slot_id],
    )?;
    Ok(changed == 1)
}

/// Take one seat regardless of capacity or active flag (concierge override).
pub fn force_take_seat(conn: &Connection, slot_id: i64) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE benefit_slots SET booked_count = booked_count + 1 WHERE id = ?1",
        [slot_id],
    )?;
    if changed == 0 {
        return Err(AppError::SlotNotFound(slot_id));
    }
    Ok(())
}

/// Give one seat back, never dropping below zero.
pub fn release_seat(conn: &Connection, slot_id: i64) -> AppResult<()> {
    conn.execute(
        "UPDATE benefit_slots
         SET booked_count = MAX(booked_count - 1, 0)
         WHERE id = ?1",
        [slot_id],
    )?;
    Ok(())
}

pub fn set_active(conn: &Connection, slot_id: i64, active: bool) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE benefit_slots SET is_active = ?1 WHERE id = ?2",
        params![if active { 1 } else { 0 }, slot_id],
    )?;
    if changed == 0 {
        return Err(AppError::SlotNotFound(slot_id));
    }
    Ok(())
}
