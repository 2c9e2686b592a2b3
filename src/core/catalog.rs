//! Benefit catalog and per-branch slot settings.

use crate::config::Config;
use crate::db::log::audit;
use crate::db::queries::{benefit_types, settings};
use crate::errors::{AppError, AppResult};
use crate::models::benefit_type::BenefitType;
use crate::models::settings::BenefitSettings;
use crate::models::weekdays::Weekdays;
use crate::utils::time::parse_required_time;
use chrono::NaiveTime;
use rusqlite::Connection;

/// Values an operator passes to `settings set`; `None` keeps the current
/// value (or the configured default for a new row).
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub capacity: Option<i64>,
    pub slot_minutes: Option<i64>,
    pub open: Option<NaiveTime>,
    pub close: Option<NaiveTime>,
    pub days: Option<Weekdays>,
}

pub struct CatalogLogic;

impl CatalogLogic {
    pub fn add_benefit_type(
        conn: &Connection,
        code: &str,
        name: &str,
        icon: &str,
    ) -> AppResult<BenefitType> {
        let id = benefit_types::insert_benefit_type(conn, code, name, icon)?;
        let bt = benefit_types::find_by_id(conn, id)?
            .ok_or_else(|| AppError::BenefitTypeNotFound(code.to_string()))?;

        audit(conn, "benefit_add", &bt.code, &format!("Added benefit '{}'", bt.name))?;
        Ok(bt)
    }

    /// Settings template built from the configuration defaults.
    pub fn config_defaults(cfg: &Config, branch_id: &str) -> AppResult<BenefitSettings> {
        Ok(BenefitSettings {
            id: 0,
            branch_id: branch_id.to_string(),
            benefit_type_id: None,
            capacity: cfg.default_capacity,
            slot_minutes: cfg.default_slot_minutes,
            open_time: parse_required_time(&cfg.default_open)?,
            close_time: parse_required_time(&cfg.default_close)?,
            active_days: Weekdays::parse(&cfg.default_days)?,
            updated_at: String::new(),
        })
    }

    /// Create or update the settings of a branch (`benefit_code = None`) or of
    /// one benefit in that branch.
    pub fn apply_settings(
        conn: &Connection,
        cfg: &Config,
        branch_id: &str,
        benefit_code: Option<&str>,
        patch: &SettingsPatch,
    ) -> AppResult<BenefitSettings> {
        let benefit = benefit_code
            .map(|code| benefit_types::require_by_code(conn, code))
            .transpose()?;
        let benefit_type_id = benefit.as_ref().map(|b| b.id);

        let base = match settings::find_scoped(conn, branch_id, benefit_type_id)? {
            Some(existing) => existing,
            None => match benefit_type_id {
                Some(id) => match settings::resolve(conn, branch_id, id)? {
                    Some(branch_default) => branch_default,
                    None => Self::config_defaults(cfg, branch_id)?,
                },
                None => Self::config_defaults(cfg, branch_id)?,
            },
        };

        let merged = BenefitSettings {
            id: 0,
            branch_id: branch_id.to_string(),
            benefit_type_id,
            capacity: patch.capacity.unwrap_or(base.capacity),
            slot_minutes: patch.slot_minutes.unwrap_or(base.slot_minutes),
            open_time: patch.open.unwrap_or(base.open_time),
            close_time: patch.close.unwrap_or(base.close_time),
            active_days: patch.days.unwrap_or(base.active_days),
            updated_at: String::new(),
        };

        settings::upsert(conn, &merged)?;
        let saved = settings::find_scoped(conn, branch_id, benefit_type_id)?.ok_or_else(|| {
            AppError::SettingsNotFound {
                branch: branch_id.to_string(),
                benefit: benefit_code.unwrap_or("*").to_string(),
            }
        })?;

        audit(
            conn,
            "settings",
            &format!("{}/{}", branch_id, benefit_code.unwrap_or("*")),
            &format!(
                "capacity={} slot={}m {}-{} days={}",
                saved.capacity,
                saved.slot_minutes,
                saved.open_time.format("%H:%M"),
                saved.close_time.format("%H:%M"),
                saved.active_days
            ),
        )?;

        Ok(saved)
    }

    /// Benefit plus the settings that apply to it in `branch_id`.
    pub fn effective_settings(
        conn: &Connection,
        branch_id: &str,
        benefit_code: &str,
    ) -> AppResult<(BenefitType, BenefitSettings)> {
        let benefit = benefit_types::require_by_code(conn, benefit_code)?;
        let s = settings::require_resolved(conn, branch_id, benefit.id, &benefit.code)?;
        Ok((benefit, s))
    }
}
