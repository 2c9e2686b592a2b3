use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// A concrete bookable interval for one date.
#[derive(Debug, Clone, Serialize)]
pub struct BenefitSlot {
    pub id: i64,
    pub branch_id: String,
    pub benefit_type_id: i64,
    pub slot_date: NaiveDate,  // ⇔ benefit_slots.slot_date (TEXT "YYYY-MM-DD")
    pub start_time: NaiveTime, // ⇔ benefit_slots.start_time (TEXT "HH:MM")
    pub end_time: NaiveTime,   // ⇔ benefit_slots.end_time (TEXT "HH:MM")
    pub capacity: i64,
    pub booked_count: i64,
    pub is_active: bool,
    pub created_at: String,
}

impl BenefitSlot {
    /// Seats left; negative when force adds pushed the slot over capacity.
    pub fn remaining(&self) -> i64 {
        self.capacity - self.booked_count
    }

    pub fn is_over_capacity(&self) -> bool {
        self.booked_count > self.capacity
    }

    pub fn label(&self) -> String {
        format!(
            "{} {}-{}",
            self.slot_date.format("%Y-%m-%d"),
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}
