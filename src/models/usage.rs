use chrono::NaiveDate;
use serde::Serialize;

/// One recorded use of a benefit against a membership allotment.
#[derive(Debug, Clone, Serialize)]
pub struct BenefitUsage {
    pub id: i64,
    pub membership_id: i64,
    pub benefit_type_id: i64,
    pub used_on: NaiveDate,
    pub booking_id: Option<i64>,
    pub source: String,
    pub created_at: String,
}
