use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::{AttendanceLogic, UsageRequest};
use crate::db::pool::DbPool;
use crate::db::queries::{benefit_types, slots};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};

/// Mark a booking attended or no-show. With `--usage` the visit is also
/// counted against the booking's membership allotment.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Attend {
        booking,
        no_show,
        usage,
    } = cmd
    {
        let mut pool = DbPool::open_initialized(&cfg.database)?;

        let b = AttendanceLogic::mark(&mut pool.conn, *booking, !*no_show)?;
        success(format!("Booking #{} of {} marked {}", b.id, b.member_id, b.status));

        if *usage {
            let Some(membership_id) = b.membership_id else {
                warning(format!(
                    "Booking #{} has no membership; no usage recorded",
                    b.id
                ));
                return Ok(());
            };

            let slot = slots::require_slot(&pool.conn, b.slot_id)?;
            let bt = benefit_types::find_by_id(&pool.conn, slot.benefit_type_id)?
                .ok_or_else(|| AppError::BenefitTypeNotFound(format!("#{}", slot.benefit_type_id)))?;

            let receipt = AttendanceLogic::record_usage(
                &mut pool.conn,
                &UsageRequest {
                    membership_id,
                    benefit_code: &bt.code,
                    used_on: slot.slot_date,
                    booking_id: Some(b.id),
                    source: &cfg.booking_source,
                },
            )?;
            success(format!(
                "Usage recorded: {}/{} {} this {} ({} left)",
                receipt.used,
                receipt.allowance,
                bt.code,
                receipt.period,
                receipt.remaining()
            ));
        }
    }

    Ok(())
}
