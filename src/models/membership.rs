use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Frozen,
    Expired,
    Cancelled,
}

impl MembershipStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Frozen => "frozen",
            MembershipStatus::Expired => "expired",
            MembershipStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(MembershipStatus::Active),
            "frozen" => Some(MembershipStatus::Frozen),
            "expired" => Some(MembershipStatus::Expired),
            "cancelled" => Some(MembershipStatus::Cancelled),
            _ => None,
        }
    }

    /// Helper: parse user input (any case)
    pub fn parse(s: &str) -> AppResult<Self> {
        Self::from_db_str(&s.trim().to_lowercase())
            .ok_or_else(|| AppError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// The commercial record granting benefit eligibility.
#[derive(Debug, Clone, Serialize)]
pub struct Membership {
    pub id: i64,
    pub member_id: String,
    pub plan: String,
    pub status: MembershipStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>, // None = open-ended
    pub created_at: String,
}

impl Membership {
    /// Active status and `date` inside `[start_date, end_date]`.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.status == MembershipStatus::Active
            && self.start_date <= date
            && self.end_date.is_none_or(|end| date <= end)
    }
}

/// Window over which an allotment allowance is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllotmentPeriod {
    Day,
    Week,
    Month,
    Total,
}

impl AllotmentPeriod {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AllotmentPeriod::Day => "day",
            AllotmentPeriod::Week => "week",
            AllotmentPeriod::Month => "month",
            AllotmentPeriod::Total => "total",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "day" => Some(AllotmentPeriod::Day),
            "week" => Some(AllotmentPeriod::Week),
            "month" => Some(AllotmentPeriod::Month),
            "total" => Some(AllotmentPeriod::Total),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        let lowered = s.trim().to_lowercase();
        let key = match lowered.as_str() {
            "daily" => "day",
            "weekly" => "week",
            "monthly" => "month",
            other => other,
        };
        Self::from_db_str(key).ok_or_else(|| AppError::InvalidPeriod(s.to_string()))
    }

    /// Inclusive date bounds of the period containing `date`.
    /// Weeks start on Monday. `Total` has no bounds (`Ok(None)`); a period
    /// that falls off the calendar is an `InvalidDate`.
    pub fn bounds(&self, date: NaiveDate) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
        if let AllotmentPeriod::Total = self {
            return Ok(None);
        }
        self.calendar_bounds(date).map(Some).ok_or_else(|| {
            AppError::InvalidDate(format!("no {} period contains {}", self, date))
        })
    }

    fn calendar_bounds(&self, date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            AllotmentPeriod::Day => Some((date, date)),
            AllotmentPeriod::Week => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                let start = date.checked_sub_days(Days::new(offset))?;
                let end = start.checked_add_days(Days::new(6))?;
                Some((start, end))
            }
            AllotmentPeriod::Month => {
                let start = date.with_day(1)?;
                let (y, m) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                let end = NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()?;
                Some((start, end))
            }
            AllotmentPeriod::Total => None,
        }
    }
}

impl fmt::Display for AllotmentPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// Number of uses of a benefit a membership grants per period.
#[derive(Debug, Clone, Serialize)]
pub struct BenefitAllotment {
    pub id: i64,
    pub membership_id: i64,
    pub benefit_type_id: i64,
    pub allowance: i64,
    pub period: AllotmentPeriod,
}
