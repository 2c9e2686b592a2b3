use super::booking_status::BookingStatus;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;

/// A member's reservation against a slot.
#[derive(Debug, Clone, Serialize)]
pub struct BenefitBooking {
    pub id: i64,
    pub slot_id: i64,
    pub member_id: String,
    pub membership_id: Option<i64>,
    pub status: BookingStatus,
    pub forced: bool, // booked through the concierge override
    pub source: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl BenefitBooking {
    /// New `booked` row, not yet persisted (`id = 0`).
    pub fn new(
        slot_id: i64,
        member_id: &str,
        membership_id: Option<i64>,
        forced: bool,
        source: &str,
        notes: &str,
    ) -> Self {
        let now = Local::now().to_rfc3339();
        Self {
            id: 0,
            slot_id,
            member_id: member_id.to_string(),
            membership_id,
            status: BookingStatus::Booked,
            forced,
            source: source.to_string(),
            notes: notes.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Booking joined with its slot and benefit, used by listings and exports.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    pub booking_id: i64,
    pub slot_id: i64,
    pub branch_id: String,
    pub benefit: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_hhmm")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm")]
    pub end_time: NaiveTime,
    pub member_id: String,
    pub membership_id: Option<i64>,
    pub status: BookingStatus,
    pub forced: bool,
    pub source: String,
    pub notes: String,
}

fn serialize_hhmm<S: serde::Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&t.format("%H:%M").to_string())
}
