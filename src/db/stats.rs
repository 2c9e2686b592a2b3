use crate::db::migrate::applied_versions;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, MAGENTA, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Aggregate figures shown by `db --info`.
#[derive(Debug, Default)]
pub struct DbStats {
    pub benefit_types: i64,
    pub slots: i64,
    pub active_slots: i64,
    pub over_capacity_slots: i64,
    pub bookings: i64,
    pub forced_bookings: i64,
    pub memberships: i64,
    pub usage_events: i64,
    pub first_slot_date: Option<String>,
    pub last_slot_date: Option<String>,
}

fn count(pool: &DbPool, sql: &str) -> rusqlite::Result<i64> {
    pool.conn.query_row(sql, [], |row| row.get(0))
}

pub fn collect(pool: &DbPool) -> AppResult<DbStats> {
    let first_slot_date = pool
        .conn
        .query_row("SELECT MIN(slot_date) FROM benefit_slots", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();
    let last_slot_date = pool
        .conn
        .query_row("SELECT MAX(slot_date) FROM benefit_slots", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();

    Ok(DbStats {
        benefit_types: count(pool, "SELECT COUNT(*) FROM benefit_types")?,
        slots: count(pool, "SELECT COUNT(*) FROM benefit_slots")?,
        active_slots: count(pool, "SELECT COUNT(*) FROM benefit_slots WHERE is_active = 1")?,
        over_capacity_slots: count(
            pool,
            "SELECT COUNT(*) FROM benefit_slots WHERE booked_count > capacity",
        )?,
        bookings: count(pool, "SELECT COUNT(*) FROM benefit_bookings")?,
        forced_bookings: count(pool, "SELECT COUNT(*) FROM benefit_bookings WHERE forced = 1")?,
        memberships: count(pool, "SELECT COUNT(*) FROM memberships")?,
        usage_events: count(pool, "SELECT COUNT(*) FROM benefit_usage")?,
        first_slot_date,
        last_slot_date,
    })
}

/// `PRAGMA integrity_check`; `None` when the database is sound, otherwise
/// the problems SQLite reported.
pub fn integrity_problems(pool: &DbPool) -> AppResult<Option<String>> {
    let mut stmt = pool.conn.prepare("PRAGMA integrity_check;")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut lines = Vec::new();
    for r in rows {
        lines.push(r?);
    }
    if lines.len() == 1 && lines[0] == "ok" {
        return Ok(None);
    }
    Ok(Some(lines.join("; ")))
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    let stats = collect(pool)?;

    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!(
        "{}• Schema:{} {} migration(s) applied",
        CYAN,
        RESET,
        applied_versions(&pool.conn)?.len()
    );

    println!("{}• Benefit types:{} {}", CYAN, RESET, stats.benefit_types);
    println!(
        "{}• Slots:{} {}{}{} ({} active)",
        CYAN, RESET, GREEN, stats.slots, RESET, stats.active_slots
    );
    if stats.over_capacity_slots > 0 {
        println!(
            "{}• Over capacity:{} {}{}{}",
            CYAN, RESET, MAGENTA, stats.over_capacity_slots, RESET
        );
    }
    println!(
        "{}• Bookings:{} {}{}{} ({} forced)",
        CYAN, RESET, GREEN, stats.bookings, RESET, stats.forced_bookings
    );
    println!("{}• Memberships:{} {}", CYAN, RESET, stats.memberships);
    println!("{}• Usage events:{} {}", CYAN, RESET, stats.usage_events);

    let dash = format!("{GREY}--{RESET}");
    println!("{}• Slot dates:{}", CYAN, RESET);
    println!(
        "    from: {}",
        stats.first_slot_date.as_deref().unwrap_or(&dash)
    );
    println!(
        "    to:   {}",
        stats.last_slot_date.as_deref().unwrap_or(&dash)
    );

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_is_sound_and_empty() {
        let pool = DbPool::in_memory().unwrap();
        assert_eq!(integrity_problems(&pool).unwrap(), None);

        let stats = collect(&pool).unwrap();
        assert_eq!(stats.slots, 0);
        assert_eq!(stats.forced_bookings, 0);
        assert_eq!(stats.first_slot_date, None);
    }
}
