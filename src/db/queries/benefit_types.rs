use crate::errors::{AppError, AppResult};
use crate::models::benefit_type::BenefitType;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<BenefitType> {
    Ok(BenefitType {
        id: row.get("id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        icon: row.get("icon")?,
        is_active: row.get::<_, i64>("is_active")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_benefit_type(conn: &Connection, code: &str, name: &str, icon: &str) -> AppResult<i64> {
    let code = BenefitType::normalize_code(code);
    if code.is_empty() {
        return Err(AppError::Other("Benefit code cannot be empty".into()));
    }
    if find_by_code(conn, &code)?.is_some() {
        return Err(AppError::BenefitTypeExists(code));
    }

    conn.execute(
        "INSERT INTO benefit_types (code, name, icon, is_active, created_at)
         VALUES (?1, ?2, ?3, 1, ?4)",
        params![code, name.trim(), icon, Local::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_code(conn: &Connection, code: &str) -> AppResult<Option<BenefitType>> {
    let found = conn
        .query_row(
            "SELECT * FROM benefit_types WHERE code = ?1",
            [BenefitType::normalize_code(code)],
            map_row,
        )
        .optional()?;
    Ok(found)
}

/// Lookup by code, failing with `BenefitTypeNotFound`.
pub fn require_by_code(conn: &Connection, code: &str) -> AppResult<BenefitType> {
    find_by_code(conn, code)?.ok_or_else(|| AppError::BenefitTypeNotFound(code.to_string()))
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<BenefitType>> {
    let found = conn
        .query_row("SELECT * FROM benefit_types WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(found)
}

pub fn list_benefit_types(conn: &Connection) -> AppResult<Vec<BenefitType>> {
    let mut stmt = conn.prepare("SELECT * FROM benefit_types ORDER BY code ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
