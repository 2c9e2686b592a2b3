use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::booking::{BookingLogic, BookingRequest};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Book a member into a slot; `--force` takes the concierge path.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Book {
        slot,
        member,
        membership,
        force,
        notes,
    } = cmd
    {
        let mut pool = DbPool::open_initialized(&cfg.database)?;

        let req = BookingRequest {
            slot_id: *slot,
            member_id: member.trim(),
            membership_id: *membership,
            force: *force,
            source: &cfg.booking_source,
            notes,
        };
        let receipt = BookingLogic::book(&mut pool.conn, &req)?;

        success(format!(
            "Booking #{}{}: {} in slot #{} ({}) [{}/{}]",
            receipt.booking.id,
            if receipt.booking.forced { " (forced)" } else { "" },
            receipt.booking.member_id,
            receipt.slot.id,
            receipt.slot.label(),
            receipt.slot.booked_count,
            receipt.slot.capacity
        ));
        if receipt.over_capacity() {
            warning(format!(
                "Slot #{} is now over capacity by {}",
                receipt.slot.id,
                -receipt.slot.remaining()
            ));
        }
    }

    Ok(())
}
