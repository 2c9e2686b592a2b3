use super::weekdays::Weekdays;
use crate::errors::{AppError, AppResult};
use crate::utils::time::minutes_of_day;
use chrono::NaiveTime;
use serde::Serialize;

/// Per-branch (and optionally per-benefit-type) slot configuration.
///
/// A row with `benefit_type_id = None` is the branch default; a row bound to a
/// benefit type overrides it for that benefit.
#[derive(Debug, Clone, Serialize)]
pub struct BenefitSettings {
    pub id: i64,
    pub branch_id: String,
    pub benefit_type_id: Option<i64>,
    pub capacity: i64,
    pub slot_minutes: i64,
    pub open_time: NaiveTime,  // ⇔ benefit_settings.open_time  (TEXT "HH:MM")
    pub close_time: NaiveTime, // ⇔ benefit_settings.close_time (TEXT "HH:MM")
    pub active_days: Weekdays, // ⇔ benefit_settings.active_days (TEXT "mon,tue,...")
    pub updated_at: String,
}

impl BenefitSettings {
    /// Check the values the slot generator relies on.
    pub fn validate(&self) -> AppResult<()> {
        if self.capacity < 1 {
            return Err(AppError::InvalidSettings(format!(
                "capacity must be at least 1 (got {})",
                self.capacity
            )));
        }
        if self.slot_minutes < 1 {
            return Err(AppError::InvalidSettings(format!(
                "slot duration must be at least 1 minute (got {})",
                self.slot_minutes
            )));
        }
        if self.close_time <= self.open_time {
            return Err(AppError::InvalidSettings(format!(
                "close time {} must be later than open time {}",
                self.close_time.format("%H:%M"),
                self.open_time.format("%H:%M")
            )));
        }
        let window = minutes_of_day(self.close_time) - minutes_of_day(self.open_time);
        if self.slot_minutes > window {
            return Err(AppError::InvalidSettings(format!(
                "slot duration {}m does not fit the {}m operating window",
                self.slot_minutes, window
            )));
        }
        if self.active_days.is_empty() {
            return Err(AppError::InvalidSettings(
                "at least one active day is required".into(),
            ));
        }
        Ok(())
    }

    /// Number of whole slots that fit in the operating window.
    pub fn slots_per_day(&self) -> i64 {
        if self.slot_minutes < 1 {
            return 0;
        }
        let window = minutes_of_day(self.close_time) - minutes_of_day(self.open_time);
        (window / self.slot_minutes).max(0)
    }
}
