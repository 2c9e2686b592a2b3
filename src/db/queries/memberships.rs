use super::{date_col, enum_col, fmt_date, opt_date_col};
use crate::errors::{AppError, AppResult};
use crate::models::membership::{AllotmentPeriod, BenefitAllotment, Membership, MembershipStatus};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<Membership> {
    Ok(Membership {
        id: row.get("id")?,
        member_id: row.get("member_id")?,
        plan: row.get("plan")?,
        status: enum_col(row, "status", MembershipStatus::from_db_str)?,
        start_date: date_col(row, "start_date")?,
        end_date: opt_date_col(row, "end_date")?,
        created_at: row.get("created_at")?,
    })
}

fn map_allotment(row: &Row) -> rusqlite::Result<BenefitAllotment> {
    Ok(BenefitAllotment {
        id: row.get("id")?,
        membership_id: row.get("membership_id")?,
        benefit_type_id: row.get("benefit_type_id")?,
        allowance: row.get("allowance")?,
        period: enum_col(row, "period", AllotmentPeriod::from_db_str)?,
    })
}

pub fn insert_membership(conn: &Connection, m: &Membership) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO memberships (member_id, plan, status, start_date, end_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            m.member_id,
            m.plan,
            m.status.to_db_str(),
            fmt_date(&m.start_date),
            m.end_date.as_ref().map(fmt_date),
            m.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_membership(conn: &Connection, id: i64) -> AppResult<Option<Membership>> {
    let found = conn
        .query_row("SELECT * FROM memberships WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(found)
}

pub fn require_membership(conn: &Connection, id: i64) -> AppResult<Membership> {
    find_membership(conn, id)?.ok_or_else(|| AppError::MembershipNotFound(format!("#{}", id)))
}

/// The member's earliest-starting membership that is valid on `date`.
pub fn find_valid_for_member(
    conn: &Connection,
    member_id: &str,
    date: &NaiveDate,
) -> AppResult<Option<Membership>> {
    let d = fmt_date(date);
    let found = conn
        .query_row(
            "SELECT * FROM memberships
             WHERE member_id = ?1
               AND status = 'active'
               AND start_date <= ?2
               AND (end_date IS NULL OR end_date >= ?2)
             ORDER BY start_date ASC, id ASC
             LIMIT 1",
            params![member_id, d],
            map_row,
        )
        .optional()?;
    Ok(found)
}

pub fn list_for_member(conn: &Connection, member_id: &str) -> AppResult<Vec<Membership>> {
    let mut stmt =
        conn.prepare("SELECT * FROM memberships WHERE member_id = ?1 ORDER BY start_date ASC")?;
    let rows = stmt.query_map([member_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_status(conn: &Connection, id: i64, status: MembershipStatus) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE memberships SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    if changed == 0 {
        return Err(AppError::MembershipNotFound(format!("#{}", id)));
    }
    Ok(())
}

/// Insert or replace the allotment of one benefit on a membership.
pub fn upsert_allotment(
    conn: &Connection,
    membership_id: i64,
    benefit_type_id: i64,
    allowance: i64,
    period: AllotmentPeriod,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO membership_benefits (membership_id, benefit_type_id, allowance, period)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(membership_id, benefit_type_id)
         DO UPDATE SET allowance = excluded.allowance, period = excluded.period",
        params![membership_id, benefit_type_id, allowance, period.to_db_str()],
    )?;
    Ok(())
}

pub fn find_allotment(
    conn: &Connection,
    membership_id: i64,
    benefit_type_id: i64,
) -> AppResult<Option<BenefitAllotment>> {
    let found = conn
        .query_row(
            "SELECT * FROM membership_benefits
             WHERE membership_id = ?1 AND benefit_type_id = ?2",
            params![membership_id, benefit_type_id],
            map_allotment,
        )
        .optional()?;
    Ok(found)
}

pub fn list_allotments(conn: &Connection, membership_id: i64) -> AppResult<Vec<BenefitAllotment>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM membership_benefits WHERE membership_id = ?1 ORDER BY benefit_type_id ASC",
    )?;
    let rows = stmt.query_map([membership_id], map_allotment)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
