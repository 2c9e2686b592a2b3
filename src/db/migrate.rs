use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};

/// Named schema steps, applied in order and recorded in `log` as
/// `migration_applied` rows. Never edit a shipped step: append a new one.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250901_0001_benefit_catalog_and_slots",
        "Created benefit_types, benefit_settings and benefit_slots",
        r#"
        CREATE TABLE IF NOT EXISTS benefit_types (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            code        TEXT NOT NULL UNIQUE,
            name        TEXT NOT NULL,
            icon        TEXT NOT NULL DEFAULT '',
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS benefit_settings (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            branch_id        TEXT NOT NULL,
            benefit_type_id  INTEGER REFERENCES benefit_types(id),
            capacity         INTEGER NOT NULL CHECK(capacity >= 1),
            slot_minutes     INTEGER NOT NULL CHECK(slot_minutes >= 1),
            open_time        TEXT NOT NULL,
            close_time       TEXT NOT NULL,
            active_days      TEXT NOT NULL DEFAULT 'mon,tue,wed,thu,fri,sat,sun',
            updated_at       TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_benefit_settings_scope
            ON benefit_settings(branch_id, IFNULL(benefit_type_id, 0));

        CREATE TABLE IF NOT EXISTS benefit_slots (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            branch_id        TEXT NOT NULL,
            benefit_type_id  INTEGER NOT NULL REFERENCES benefit_types(id),
            slot_date        TEXT NOT NULL,
            start_time       TEXT NOT NULL,
            end_time         TEXT NOT NULL,
            capacity         INTEGER NOT NULL CHECK(capacity >= 1),
            booked_count     INTEGER NOT NULL DEFAULT 0 CHECK(booked_count >= 0),
            is_active        INTEGER NOT NULL DEFAULT 1,
            created_at       TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_benefit_slots_interval
            ON benefit_slots(branch_id, benefit_type_id, slot_date, start_time);
        CREATE INDEX IF NOT EXISTS idx_benefit_slots_date
            ON benefit_slots(slot_date);
        "#,
    ),
    (
        "20250915_0002_memberships_and_allotments",
        "Created memberships and membership_benefits",
        r#"
        CREATE TABLE IF NOT EXISTS memberships (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id   TEXT NOT NULL,
            plan        TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'active'
                        CHECK(status IN ('active','frozen','expired','cancelled')),
            start_date  TEXT NOT NULL,
            end_date    TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memberships_member ON memberships(member_id);

        CREATE TABLE IF NOT EXISTS membership_benefits (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            membership_id    INTEGER NOT NULL REFERENCES memberships(id),
            benefit_type_id  INTEGER NOT NULL REFERENCES benefit_types(id),
            allowance        INTEGER NOT NULL CHECK(allowance >= 0),
            period           TEXT NOT NULL CHECK(period IN ('day','week','month','total')),
            UNIQUE(membership_id, benefit_type_id)
        );
        "#,
    ),
    (
        "20251001_0003_bookings_and_usage",
        "Created benefit_bookings and benefit_usage",
        r#"
        CREATE TABLE IF NOT EXISTS benefit_bookings (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            slot_id        INTEGER NOT NULL REFERENCES benefit_slots(id),
            member_id      TEXT NOT NULL,
            membership_id  INTEGER REFERENCES memberships(id),
            status         TEXT NOT NULL DEFAULT 'booked'
                           CHECK(status IN ('booked','attended','no_show','cancelled')),
            forced         INTEGER NOT NULL DEFAULT 0,
            source         TEXT NOT NULL DEFAULT 'cli',
            notes          TEXT NOT NULL DEFAULT '',
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_benefit_bookings_slot ON benefit_bookings(slot_id);
        CREATE INDEX IF NOT EXISTS idx_benefit_bookings_member ON benefit_bookings(member_id);

        CREATE TABLE IF NOT EXISTS benefit_usage (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            membership_id    INTEGER NOT NULL REFERENCES memberships(id),
            benefit_type_id  INTEGER NOT NULL REFERENCES benefit_types(id),
            used_on          TEXT NOT NULL,
            booking_id       INTEGER REFERENCES benefit_bookings(id),
            source           TEXT NOT NULL DEFAULT 'cli',
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_benefit_usage_lookup
            ON benefit_usage(membership_id, benefit_type_id, used_on);
        "#,
    ),
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM log
             WHERE operation = 'migration_applied' AND target = ?1
             LIMIT 1",
            [version],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn apply(conn: &Connection, version: &str, message: &str, sql: &str) -> AppResult<()> {
    let script = format!(
        "BEGIN;\n{}\nINSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', '{}', '{}');\nCOMMIT;",
        sql, version, message
    );

    if let Err(e) = conn.execute_batch(&script) {
        // leave the connection usable for the caller
        let _ = conn.execute_batch("ROLLBACK;");
        return Err(AppError::Migration(format!("{}: {}", version, e)));
    }

    tracing::debug!(version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations.
/// Returns how many steps were applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, message, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn, version, message, sql)?;
        applied += 1;
    }

    Ok(applied)
}

/// Versions already recorded in the database, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
