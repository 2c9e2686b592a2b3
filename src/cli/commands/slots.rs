use crate::cli::parser::{Commands, SlotsAction};
use crate::config::Config;
use crate::core::catalog::CatalogLogic;
use crate::core::generator::SlotGenerator;
use crate::db::pool::DbPool;
use crate::db::queries::{benefit_types, slots};
use crate::errors::{AppError, AppResult};
use crate::models::weekdays::Weekdays;
use crate::ui::messages::{error, info, success, warning};
use crate::utils::colors::{RESET, color_for_remaining};
use crate::utils::date::{parse_required_date, today};
use crate::utils::table::{Column, Table};
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Slots { action } = cmd else {
        return Ok(());
    };
    let mut pool = DbPool::open_initialized(&cfg.database)?;

    match action {
        SlotsAction::Generate {
            branch,
            benefit,
            date,
            from,
            to,
            days,
        } => {
            let branch = branch.as_deref().unwrap_or(&cfg.default_branch);
            let (bt, settings) = CatalogLogic::effective_settings(&pool.conn, branch, benefit)?;

            match (date, from, to) {
                (_, Some(from), Some(to)) => {
                    let from = parse_required_date(from)?;
                    let to = parse_required_date(to)?;
                    let filter = days.as_deref().map(Weekdays::parse).transpose()?;

                    let report = SlotGenerator::generate_range(
                        &mut pool.conn,
                        branch,
                        &bt,
                        from,
                        to,
                        filter,
                        &settings,
                    )?;

                    for (date, e) in report.failures() {
                        error(format!("{}: {}", date, e));
                    }
                    let summary = format!(
                        "{}/{} date(s) generated for {} in {}, {} slot(s) created",
                        report.succeeded(),
                        report.total(),
                        bt.code,
                        branch,
                        report.slots_created()
                    );
                    if report.failed() > 0 {
                        warning(summary);
                    } else {
                        success(summary);
                    }
                }
                (Some(date), _, _) => {
                    let date = parse_required_date(date)?;
                    let report =
                        SlotGenerator::generate_for_date(&mut pool.conn, branch, &bt, date, &settings)?;

                    if report.closed {
                        info(format!("{} is closed in {} on {}", bt.code, branch, date));
                    } else if report.existing > 0 {
                        info(format!(
                            "{} already has {} {} slot(s) in {}; nothing created",
                            date, report.existing, bt.code, branch
                        ));
                    } else {
                        success(format!(
                            "{} {} slot(s) created for {} in {}",
                            report.created, bt.code, date, branch
                        ));
                    }
                }
                _ => {
                    return Err(AppError::InvalidDate(
                        "use --date or --from/--to".to_string(),
                    ));
                }
            }
        }

        SlotsAction::List {
            date,
            branch,
            benefit,
        } => {
            let date = match date {
                Some(d) => parse_required_date(d)?,
                None => today(),
            };
            let benefit_id = benefit
                .as_deref()
                .map(|code| benefit_types::require_by_code(&pool.conn, code))
                .transpose()?
                .map(|bt| bt.id);

            let rows = slots::list_for_date(&pool.conn, &date, branch.as_deref(), benefit_id)?;
            if rows.is_empty() {
                info(format!("No slots on {}", date));
                return Ok(());
            }

            let codes: HashMap<i64, String> = benefit_types::list_benefit_types(&pool.conn)?
                .into_iter()
                .map(|bt| (bt.id, bt.code))
                .collect();

            let mut table = Table::new(vec![
                Column::new("ID", 5),
                Column::new("Branch", 10),
                Column::new("Benefit", 12),
                Column::new("Time", 11),
                Column::new("Active", 6),
                Column::new("Booked", 7),
                Column::new("Left", 4),
            ]);
            for s in rows {
                let left = s.remaining();
                table.add_row(vec![
                    s.id.to_string(),
                    s.branch_id.clone(),
                    codes
                        .get(&s.benefit_type_id)
                        .cloned()
                        .unwrap_or_else(|| format!("#{}", s.benefit_type_id)),
                    format!(
                        "{}-{}",
                        s.start_time.format("%H:%M"),
                        s.end_time.format("%H:%M")
                    ),
                    if s.is_active { "yes" } else { "no" }.to_string(),
                    format!("{}/{}", s.booked_count, s.capacity),
                    format!("{}{}{}", color_for_remaining(left), left, RESET),
                ]);
            }
            print!("{}", table.render());
        }

        SlotsAction::Deactivate { id, undo } => {
            let slot = SlotGenerator::set_active(&pool.conn, *id, *undo)?;
            if slot.is_active {
                success(format!("Slot #{} ({}) is open for booking again", slot.id, slot.label()));
            } else {
                success(format!("Slot #{} ({}) deactivated", slot.id, slot.label()));
                if slot.booked_count > 0 {
                    warning(format!(
                        "{} existing booking(s) on this slot are kept",
                        slot.booked_count
                    ));
                }
            }
        }
    }

    Ok(())
}
