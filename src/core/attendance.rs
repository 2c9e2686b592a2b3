//! Attendance marking and usage accounting against membership allotments.

use crate::db::log::audit;
use crate::db::queries::{benefit_types, bookings, memberships, usage};
use crate::errors::{AppError, AppResult};
use crate::models::booking::BenefitBooking;
use crate::models::booking_status::BookingStatus;
use crate::models::membership::AllotmentPeriod;
use crate::models::usage::BenefitUsage;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

/// What a recorded usage left of the allotment.
#[derive(Debug, Clone)]
pub struct UsageReceipt {
    pub usage_id: i64,
    pub used: i64,
    pub allowance: i64,
    pub period: AllotmentPeriod,
}

impl UsageReceipt {
    pub fn remaining(&self) -> i64 {
        (self.allowance - self.used).max(0)
    }
}

#[derive(Debug, Clone)]
pub struct UsageRequest<'a> {
    pub membership_id: i64,
    pub benefit_code: &'a str,
    pub used_on: NaiveDate,
    pub booking_id: Option<i64>,
    pub source: &'a str,
}

pub struct AttendanceLogic;

impl AttendanceLogic {
    /// `booked → attended` or `booked → no_show`. Terminal bookings are left
    /// untouched and reported as `InvalidTransition`.
    pub fn mark(conn: &mut Connection, booking_id: i64, attended: bool) -> AppResult<BenefitBooking> {
        let tx = conn.transaction()?;

        let booking = bookings::require_booking(&tx, booking_id)?;
        let next = if attended {
            BookingStatus::Attended
        } else {
            BookingStatus::NoShow
        };

        if !booking.status.can_transition_to(next)
            || !bookings::transition_status(&tx, booking_id, BookingStatus::Booked, next)?
        {
            return Err(AppError::InvalidTransition {
                id: booking_id,
                from: booking.status.to_string(),
                to: next.to_string(),
            });
        }

        audit(
            &tx,
            if attended { "attend" } else { "no_show" },
            &format!("booking #{}", booking_id),
            &format!("{} marked {} on slot #{}", booking.member_id, next, booking.slot_id),
        )?;

        let updated = bookings::require_booking(&tx, booking_id)?;
        tx.commit()?;
        tracing::info!(booking = booking_id, status = %next, "attendance recorded");
        Ok(updated)
    }

    /// Record one use of a benefit against the membership allotment for the
    /// period containing `used_on`.
    pub fn record_usage(conn: &mut Connection, req: &UsageRequest) -> AppResult<UsageReceipt> {
        let tx = conn.transaction()?;

        let membership = memberships::require_membership(&tx, req.membership_id)?;
        if !membership.is_valid_on(req.used_on) {
            return Err(AppError::NotEligible(format!(
                "membership #{} ({}) is not valid on {}",
                membership.id, membership.status, req.used_on
            )));
        }

        let benefit = benefit_types::require_by_code(&tx, req.benefit_code)?;
        let allotment = memberships::find_allotment(&tx, membership.id, benefit.id)?
            .ok_or_else(|| {
                AppError::NotEligible(format!(
                    "membership #{} has no '{}' allotment",
                    membership.id, benefit.code
                ))
            })?;

        let bounds = allotment.period.bounds(req.used_on)?;
        let used = usage::count_usage(&tx, membership.id, benefit.id, bounds)?;
        if used >= allotment.allowance {
            return Err(AppError::AllotmentExhausted {
                membership_id: membership.id,
                used,
                allowance: allotment.allowance,
                period: allotment.period.to_string(),
            });
        }

        let usage_id = usage::insert_usage(
            &tx,
            &BenefitUsage {
                id: 0,
                membership_id: membership.id,
                benefit_type_id: benefit.id,
                used_on: req.used_on,
                booking_id: req.booking_id,
                source: req.source.to_string(),
                created_at: Local::now().to_rfc3339(),
            },
        )?;

        audit(
            &tx,
            "usage",
            &format!("membership #{}", membership.id),
            &format!(
                "{} used {} on {} ({}/{} this {})",
                membership.member_id,
                benefit.code,
                req.used_on,
                used + 1,
                allotment.allowance,
                allotment.period
            ),
        )?;

        tx.commit()?;

        Ok(UsageReceipt {
            usage_id,
            used: used + 1,
            allowance: allotment.allowance,
            period: allotment.period,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::booking::{BookingLogic, BookingRequest};
    use crate::core::test_support::{d, fixture, member_with_membership};

    fn book(fx: &mut crate::core::test_support::Fixture, member: &str) -> i64 {
        member_with_membership(&fx.pool.conn, member);
        let r = BookingRequest {
            slot_id: fx.slot_id,
            member_id: member,
            membership_id: None,
            force: false,
            source: "test",
            notes: "",
        };
        BookingLogic::book(&mut fx.pool.conn, &r).unwrap().booking.id
    }

    #[test]
    fn attended_and_no_show_are_terminal() {
        let mut fx = fixture(3);
        let a = book(&mut fx, "m-1");
        let b = book(&mut fx, "m-2");

        let marked = AttendanceLogic::mark(&mut fx.pool.conn, a, true).unwrap();
        assert_eq!(marked.status, BookingStatus::Attended);
        let marked = AttendanceLogic::mark(&mut fx.pool.conn, b, false).unwrap();
        assert_eq!(marked.status, BookingStatus::NoShow);

        for id in [a, b] {
            for attended in [true, false] {
                let res = AttendanceLogic::mark(&mut fx.pool.conn, id, attended);
                assert!(matches!(res, Err(AppError::InvalidTransition { .. })));
            }
            assert!(BookingLogic::cancel(&mut fx.pool.conn, id).is_err());
        }

        let still = bookings::require_booking(&fx.pool.conn, a).unwrap();
        assert_eq!(still.status, BookingStatus::Attended);
    }

    #[test]
    fn cancelled_booking_cannot_be_marked() {
        let mut fx = fixture(3);
        let a = book(&mut fx, "m-1");
        BookingLogic::cancel(&mut fx.pool.conn, a).unwrap();
        assert!(AttendanceLogic::mark(&mut fx.pool.conn, a, true).is_err());
    }

    #[test]
    fn unknown_booking() {
        let mut fx = fixture(3);
        assert!(matches!(
            AttendanceLogic::mark(&mut fx.pool.conn, 42, true),
            Err(AppError::BookingNotFound(42))
        ));
    }

    fn usage_req(membership_id: i64, on: NaiveDate) -> UsageRequest<'static> {
        UsageRequest {
            membership_id,
            benefit_code: "sauna",
            used_on: on,
            booking_id: None,
            source: "test",
        }
    }

    #[test]
    fn usage_is_counted_per_period() {
        let mut fx = fixture(3);
        let ms = member_with_membership(&fx.pool.conn, "m-1");
        memberships::upsert_allotment(&fx.pool.conn, ms, fx.benefit.id, 2, AllotmentPeriod::Month)
            .unwrap();

        let first = AttendanceLogic::record_usage(&mut fx.pool.conn, &usage_req(ms, d(2025, 9, 3)))
            .unwrap();
        assert_eq!(first.used, 1);
        assert_eq!(first.remaining(), 1);

        AttendanceLogic::record_usage(&mut fx.pool.conn, &usage_req(ms, d(2025, 9, 20))).unwrap();

        let third = AttendanceLogic::record_usage(&mut fx.pool.conn, &usage_req(ms, d(2025, 9, 28)));
        assert!(matches!(
            third,
            Err(AppError::AllotmentExhausted {
                used: 2,
                allowance: 2,
                ..
            })
        ));

        // next month starts fresh
        let october =
            AttendanceLogic::record_usage(&mut fx.pool.conn, &usage_req(ms, d(2025, 10, 1)))
                .unwrap();
        assert_eq!(october.used, 1);
    }

    #[test]
    fn usage_without_allotment_or_valid_membership_is_rejected() {
        let mut fx = fixture(3);
        let ms = member_with_membership(&fx.pool.conn, "m-1");

        let res = AttendanceLogic::record_usage(&mut fx.pool.conn, &usage_req(ms, d(2025, 9, 3)));
        assert!(matches!(res, Err(AppError::NotEligible(_))));

        memberships::upsert_allotment(&fx.pool.conn, ms, fx.benefit.id, 5, AllotmentPeriod::Total)
            .unwrap();
        // before the membership starts
        let res = AttendanceLogic::record_usage(&mut fx.pool.conn, &usage_req(ms, d(2024, 12, 31)));
        assert!(matches!(res, Err(AppError::NotEligible(_))));
    }
}
