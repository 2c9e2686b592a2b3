use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::{bookings, slots};
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::date::{parse_required_date, today};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Bookings { date, slot } = cmd {
        let pool = DbPool::open_initialized(&cfg.database)?;

        let rows = match slot {
            Some(id) => {
                let s = slots::require_slot(&pool.conn, *id)?;
                bookings::list_details(&pool.conn, &s.slot_date, &s.slot_date, Some(s.id))?
            }
            None => {
                let d = match date {
                    Some(d) => parse_required_date(d)?,
                    None => today(),
                };
                bookings::list_details(&pool.conn, &d, &d, None)?
            }
        };

        if rows.is_empty() {
            info("No bookings found.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID", 5),
            Column::new("Slot", 5),
            Column::new("Date", 10),
            Column::new("Time", 11),
            Column::new("Benefit", 12),
            Column::new("Member", 14),
            Column::new("Forced", 6),
            Column::new("Status", 9),
        ]);
        for r in rows {
            let status = r.status.to_string();
            table.add_row(vec![
                r.booking_id.to_string(),
                r.slot_id.to_string(),
                r.date.to_string(),
                format!(
                    "{}-{}",
                    r.start_time.format("%H:%M"),
                    r.end_time.format("%H:%M")
                ),
                r.benefit,
                r.member_id,
                if r.forced { "yes" } else { "" }.to_string(),
                format!("{}{}{}", color_for_status(&status), status, RESET),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
