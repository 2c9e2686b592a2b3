use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date::{period_bounds, today};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let (from, to) = match range {
            Some(r) => period_bounds(r)?,
            None => period_bounds(&today().format("%Y-%m").to_string())?,
        };

        let pool = DbPool::open_initialized(&cfg.database)?;
        let n = ExportLogic::export_bookings(&pool.conn, *format, file, from, to, *force)?;
        success(format!(
            "Exported {} booking(s) from {} to {} into {}",
            n, from, to, file
        ));
    }
    Ok(())
}
