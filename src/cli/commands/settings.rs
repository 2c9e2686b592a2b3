use crate::cli::parser::{Commands, SettingsAction};
use crate::config::Config;
use crate::core::catalog::{CatalogLogic, SettingsPatch};
use crate::db::pool::DbPool;
use crate::db::queries::{benefit_types, settings};
use crate::errors::AppResult;
use crate::models::settings::BenefitSettings;
use crate::models::weekdays::Weekdays;
use crate::ui::messages::{header, info, success};
use crate::utils::table::{Column, Table};
use crate::utils::time::parse_optional_time;
use rusqlite::Connection;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings { action } = cmd {
        let pool = DbPool::open_initialized(&cfg.database)?;

        match action {
            SettingsAction::Set {
                branch,
                benefit,
                capacity,
                slot_minutes,
                open,
                close,
                days,
            } => {
                let branch = branch.as_deref().unwrap_or(&cfg.default_branch);
                let patch = SettingsPatch {
                    capacity: *capacity,
                    slot_minutes: *slot_minutes,
                    open: parse_optional_time(open.as_ref())?,
                    close: parse_optional_time(close.as_ref())?,
                    days: days.as_deref().map(Weekdays::parse).transpose()?,
                };

                let saved =
                    CatalogLogic::apply_settings(&pool.conn, cfg, branch, benefit.as_deref(), &patch)?;
                success(format!(
                    "Settings saved for {}/{}: {}",
                    branch,
                    benefit.as_deref().unwrap_or("*"),
                    describe(&saved)
                ));
            }
            SettingsAction::Show { branch } => {
                let branch = branch.as_deref().unwrap_or(&cfg.default_branch);
                let rows = settings::list_for_branch(&pool.conn, branch)?;
                if rows.is_empty() {
                    info(format!(
                        "No settings for branch '{}'; config defaults apply: capacity={} slot={}m {}-{} days={}",
                        branch,
                        cfg.default_capacity,
                        cfg.default_slot_minutes,
                        cfg.default_open,
                        cfg.default_close,
                        cfg.default_days
                    ));
                    return Ok(());
                }

                header(format!("Settings of branch '{}'", branch));
                let mut table = Table::new(vec![
                    Column::new("Benefit", 14),
                    Column::new("Cap", 4),
                    Column::new("Slot", 5),
                    Column::new("Open", 5),
                    Column::new("Close", 5),
                    Column::new("Slots/day", 9),
                    Column::new("Days", 28),
                ]);
                for s in rows {
                    table.add_row(vec![
                        scope_label(&pool.conn, &s)?,
                        s.capacity.to_string(),
                        format!("{}m", s.slot_minutes),
                        s.open_time.format("%H:%M").to_string(),
                        s.close_time.format("%H:%M").to_string(),
                        s.slots_per_day().to_string(),
                        s.active_days.to_string(),
                    ]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}

fn scope_label(conn: &Connection, s: &BenefitSettings) -> AppResult<String> {
    Ok(match s.benefit_type_id {
        None => "(default)".to_string(),
        Some(id) => benefit_types::find_by_id(conn, id)?
            .map(|bt| bt.code)
            .unwrap_or_else(|| format!("#{}", id)),
    })
}

fn describe(s: &BenefitSettings) -> String {
    format!(
        "capacity={} slot={}m {}-{} days={} ({} slot(s)/day)",
        s.capacity,
        s.slot_minutes,
        s.open_time.format("%H:%M"),
        s.close_time.format("%H:%M"),
        s.active_days,
        s.slots_per_day()
    )
}
