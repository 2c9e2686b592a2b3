use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::{AttendanceLogic, UsageRequest};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date::{parse_required_date, today};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Usage {
        membership,
        benefit,
        date,
    } = cmd
    {
        let used_on = match date {
            Some(d) => parse_required_date(d)?,
            None => today(),
        };

        let mut pool = DbPool::open_initialized(&cfg.database)?;
        let receipt = AttendanceLogic::record_usage(
            &mut pool.conn,
            &UsageRequest {
                membership_id: *membership,
                benefit_code: benefit,
                used_on,
                booking_id: None,
                source: &cfg.booking_source,
            },
        )?;

        success(format!(
            "Usage #{} recorded on {}: {}/{} this {} ({} left)",
            receipt.usage_id,
            used_on,
            receipt.used,
            receipt.allowance,
            receipt.period,
            receipt.remaining()
        ));
    }

    Ok(())
}
