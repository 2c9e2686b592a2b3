use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::booking::BookingLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Cancel { booking } = cmd {
        let mut pool = DbPool::open_initialized(&cfg.database)?;
        let b = BookingLogic::cancel(&mut pool.conn, *booking)?;
        success(format!(
            "Booking #{} of {} cancelled, seat released on slot #{}",
            b.id, b.member_id, b.slot_id
        ));
    }

    Ok(())
}
