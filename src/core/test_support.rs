//! Shared fixtures for workflow unit tests.

use crate::core::generator::SlotGenerator;
use crate::db::pool::DbPool;
use crate::db::queries::{benefit_types, memberships, slots};
use crate::models::benefit_type::BenefitType;
use crate::models::membership::{Membership, MembershipStatus};
use crate::models::settings::BenefitSettings;
use crate::models::weekdays::Weekdays;
use crate::utils::time::parse_time;
use chrono::NaiveDate;
use rusqlite::Connection;

pub struct Fixture {
    pub pool: DbPool,
    pub benefit: BenefitType,
    pub slot_id: i64,
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// In-memory database with a `sauna` benefit and one 06:00-07:00 slot on
/// 2025-09-01 holding `capacity` seats.
pub fn fixture(capacity: i64) -> Fixture {
    let mut pool = DbPool::in_memory().unwrap();
    benefit_types::insert_benefit_type(&pool.conn, "sauna", "Sauna", "").unwrap();
    let benefit = benefit_types::require_by_code(&pool.conn, "sauna").unwrap();

    let settings = BenefitSettings {
        id: 0,
        branch_id: "main".into(),
        benefit_type_id: Some(benefit.id),
        capacity,
        slot_minutes: 60,
        open_time: parse_time("06:00").unwrap(),
        close_time: parse_time("07:00").unwrap(),
        active_days: Weekdays::all(),
        updated_at: String::new(),
    };
    SlotGenerator::generate_for_date(&mut pool.conn, "main", &benefit, d(2025, 9, 1), &settings)
        .unwrap();

    let slot_id = slots::list_for_date(&pool.conn, &d(2025, 9, 1), Some("main"), None).unwrap()[0].id;

    Fixture {
        pool,
        benefit,
        slot_id,
    }
}

/// Open-ended active membership starting 2025-01-01. Returns its id.
pub fn member_with_membership(conn: &Connection, member: &str) -> i64 {
    memberships::insert_membership(
        conn,
        &Membership {
            id: 0,
            member_id: member.to_string(),
            plan: "Gold".into(),
            status: MembershipStatus::Active,
            start_date: d(2025, 1, 1),
            end_date: None,
            created_at: String::new(),
        },
    )
    .unwrap()
}
