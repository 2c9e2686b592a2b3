use crate::db::log::audit;
use crate::db::queries::bookings;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, write_csv, write_json};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write the bookings whose slot falls in `[from, to]`. Returns the row count.
    pub fn export_bookings(
        conn: &Connection,
        format: ExportFormat,
        file: &str,
        from: NaiveDate,
        to: NaiveDate,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if path.exists() && !force {
            return Err(AppError::Export(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let rows = bookings::list_details(conn, &from, &to, None)?;

        match format {
            ExportFormat::Csv => write_csv(path, &rows)?,
            ExportFormat::Json => write_json(path, &rows)?,
        }

        audit(
            conn,
            "export",
            &path.to_string_lossy(),
            &format!(
                "{} booking(s) {}..{} as {}",
                rows.len(),
                from,
                to,
                format.extension()
            ),
        )?;

        Ok(rows.len())
    }
}
