//! Memberships and their benefit allotments.

use crate::db::log::audit;
use crate::db::queries::{benefit_types, memberships};
use crate::errors::{AppError, AppResult};
use crate::models::membership::{AllotmentPeriod, BenefitAllotment, Membership, MembershipStatus};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

pub struct MembershipLogic;

impl MembershipLogic {
    pub fn add(
        conn: &Connection,
        member_id: &str,
        plan: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
        status: MembershipStatus,
    ) -> AppResult<Membership> {
        if member_id.trim().is_empty() {
            return Err(AppError::Other("Member id cannot be empty".into()));
        }
        if let Some(e) = end
            && e < start
        {
            return Err(AppError::InvalidDate(format!(
                "membership end {} is before start {}",
                e, start
            )));
        }

        let m = Membership {
            id: 0,
            member_id: member_id.trim().to_string(),
            plan: plan.trim().to_string(),
            status,
            start_date: start,
            end_date: end,
            created_at: Local::now().to_rfc3339(),
        };
        let id = memberships::insert_membership(conn, &m)?;

        audit(
            conn,
            "membership_add",
            &format!("membership #{}", id),
            &format!("{} joined plan '{}' from {}", m.member_id, m.plan, start),
        )?;

        memberships::require_membership(conn, id)
    }

    pub fn set_status(conn: &Connection, id: i64, status: MembershipStatus) -> AppResult<Membership> {
        memberships::set_status(conn, id, status)?;
        audit(
            conn,
            "membership_status",
            &format!("membership #{}", id),
            &format!("status set to {}", status),
        )?;
        memberships::require_membership(conn, id)
    }

    /// Grant `allowance` uses of a benefit per `period`, replacing any earlier grant.
    pub fn allot(
        conn: &Connection,
        membership_id: i64,
        benefit_code: &str,
        allowance: i64,
        period: AllotmentPeriod,
    ) -> AppResult<BenefitAllotment> {
        if allowance < 0 {
            return Err(AppError::Other(format!(
                "allowance cannot be negative (got {})",
                allowance
            )));
        }
        let membership = memberships::require_membership(conn, membership_id)?;
        let benefit = benefit_types::require_by_code(conn, benefit_code)?;

        memberships::upsert_allotment(conn, membership.id, benefit.id, allowance, period)?;
        audit(
            conn,
            "allot",
            &format!("membership #{}", membership.id),
            &format!("{} x {} per {}", allowance, benefit.code, period),
        )?;

        memberships::find_allotment(conn, membership.id, benefit.id)?.ok_or_else(|| {
            AppError::NotEligible(format!(
                "membership #{} has no '{}' allotment",
                membership.id, benefit.code
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CatalogLogic;
    use crate::core::test_support::d;
    use crate::db::pool::DbPool;

    #[test]
    fn end_before_start_is_rejected() {
        let pool = DbPool::in_memory().unwrap();
        let res = MembershipLogic::add(
            &pool.conn,
            "m-1",
            "Gold",
            d(2025, 6, 1),
            Some(d(2025, 5, 31)),
            MembershipStatus::Active,
        );
        assert!(matches!(res, Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn allotment_is_replaced_not_duplicated() {
        let pool = DbPool::in_memory().unwrap();
        CatalogLogic::add_benefit_type(&pool.conn, "sauna", "Sauna", "").unwrap();
        let m = MembershipLogic::add(
            &pool.conn,
            "m-1",
            "Gold",
            d(2025, 1, 1),
            None,
            MembershipStatus::Active,
        )
        .unwrap();

        MembershipLogic::allot(&pool.conn, m.id, "sauna", 4, AllotmentPeriod::Month).unwrap();
        let a = MembershipLogic::allot(&pool.conn, m.id, "sauna", 8, AllotmentPeriod::Week).unwrap();
        assert_eq!(a.allowance, 8);
        assert_eq!(a.period, AllotmentPeriod::Week);
        assert_eq!(memberships::list_allotments(&pool.conn, m.id).unwrap().len(), 1);
    }

    #[test]
    fn frozen_membership_is_not_found_as_valid() {
        let pool = DbPool::in_memory().unwrap();
        let m = MembershipLogic::add(
            &pool.conn,
            "m-1",
            "Gold",
            d(2025, 1, 1),
            None,
            MembershipStatus::Active,
        )
        .unwrap();
        MembershipLogic::set_status(&pool.conn, m.id, MembershipStatus::Frozen).unwrap();

        let found = memberships::find_valid_for_member(&pool.conn, "m-1", &d(2025, 3, 1)).unwrap();
        assert!(found.is_none());
    }
}
