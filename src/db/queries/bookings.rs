use super::{date_col, enum_col, fmt_date, time_col};
use crate::errors::{AppError, AppResult};
use crate::models::booking::{BenefitBooking, BookingDetail};
use crate::models::booking_status::BookingStatus;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<BenefitBooking> {
    Ok(BenefitBooking {
        id: row.get("id")?,
        slot_id: row.get("slot_id")?,
        member_id: row.get("member_id")?,
        membership_id: row.get("membership_id")?,
        status: enum_col(row, "status", BookingStatus::from_db_str)?,
        forced: row.get::<_, i64>("forced")? == 1,
        source: row.get("source")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn map_detail(row: &Row) -> rusqlite::Result<BookingDetail> {
    Ok(BookingDetail {
        booking_id: row.get("booking_id")?,
        slot_id: row.get("slot_id")?,
        branch_id: row.get("branch_id")?,
        benefit: row.get("benefit")?,
        date: date_col(row, "slot_date")?,
        start_time: time_col(row, "start_time")?,
        end_time: time_col(row, "end_time")?,
        member_id: row.get("member_id")?,
        membership_id: row.get("membership_id")?,
        status: enum_col(row, "status", BookingStatus::from_db_str)?,
        forced: row.get::<_, i64>("forced")? == 1,
        source: row.get("source")?,
        notes: row.get("notes")?,
    })
}

pub fn insert_booking(conn: &Connection, b: &BenefitBooking) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO benefit_bookings
         (slot_id, member_id, membership_id, status, forced, source, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            b.slot_id,
            b.member_id,
            b.membership_id,
            b.status.to_db_str(),
            if b.forced { 1 } else { 0 },
            b.source,
            b.notes,
            b.created_at,
            b.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_booking(conn: &Connection, id: i64) -> AppResult<Option<BenefitBooking>> {
    let found = conn
        .query_row("SELECT * FROM benefit_bookings WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(found)
}

pub fn require_booking(conn: &Connection, id: i64) -> AppResult<BenefitBooking> {
    find_booking(conn, id)?.ok_or(AppError::BookingNotFound(id))
}

/// A booking by this member on this slot that still counts toward the slot.
pub fn find_seat_holder(
    conn: &Connection,
    slot_id: i64,
    member_id: &str,
) -> AppResult<Option<BenefitBooking>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM benefit_bookings
         WHERE slot_id = ?1 AND member_id = ?2
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![slot_id, member_id], map_row)?;

    for row in rows {
        let booking = row?;
        if booking.status.holds_seat() {
            return Ok(Some(booking));
        }
    }
    Ok(None)
}

/// Move a booking out of `expected`. Returns `false` when the row was no
/// longer in that status, leaving it untouched.
pub fn transition_status(
    conn: &Connection,
    id: i64,
    expected: BookingStatus,
    next: BookingStatus,
) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE benefit_bookings SET status = ?1, updated_at = ?2
         WHERE id = ?3 AND status = ?4",
        params![
            next.to_db_str(),
            Local::now().to_rfc3339(),
            id,
            expected.to_db_str()
        ],
    )?;
    Ok(changed == 1)
}

/// Joined booking rows whose slot falls in `[from, to]`, optionally one slot.
pub fn list_details(
    conn: &Connection,
    from: &NaiveDate,
    to: &NaiveDate,
    slot_id: Option<i64>,
) -> AppResult<Vec<BookingDetail>> {
    let mut stmt = conn.prepare(
        "SELECT b.id AS booking_id, b.slot_id, s.branch_id, t.code AS benefit,
                s.slot_date, s.start_time, s.end_time,
                b.member_id, b.membership_id, b.status, b.forced, b.source, b.notes
         FROM benefit_bookings b
         JOIN benefit_slots s ON s.id = b.slot_id
         JOIN benefit_types t ON t.id = s.benefit_type_id
         WHERE s.slot_date BETWEEN ?1 AND ?2
           AND (?3 IS NULL OR b.slot_id = ?3)
         ORDER BY s.slot_date ASC, s.start_time ASC, b.id ASC",
    )?;
    let rows = stmt.query_map(params![fmt_date(from), fmt_date(to), slot_id], map_detail)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
