//! Slot generation: cut a benefit's operating window into fixed-length slots.

use crate::db::log::audit;
use crate::db::queries::slots;
use crate::errors::{AppError, AppResult};
use crate::models::benefit_type::BenefitType;
use crate::models::settings::BenefitSettings;
use crate::models::slot::BenefitSlot;
use crate::models::weekdays::Weekdays;
use crate::utils::date::dates_between;
use crate::utils::time::{minutes_of_day, time_from_minutes};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Result of generating one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateReport {
    pub date: NaiveDate,
    /// Slots inserted by this run.
    pub created: usize,
    /// Slots that were already there; non-zero means the date was skipped.
    pub existing: i64,
    /// The date is outside the benefit's active days.
    pub closed: bool,
}

/// Per-date outcome of a batch run.
#[derive(Debug)]
pub struct DateOutcome {
    pub date: NaiveDate,
    pub result: AppResult<DateReport>,
}

/// Best-effort batch result: one outcome per qualifying date.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DateOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn slots_created(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.created)
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = (NaiveDate, &AppError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.date, e)))
    }
}

/// Intervals for one day: start at `open`, step by `slot_minutes`, keep only
/// intervals that end at or before `close`.
pub fn intervals_for(settings: &BenefitSettings) -> AppResult<Vec<SlotInterval>> {
    settings.validate()?;

    let open = minutes_of_day(settings.open_time);
    let close = minutes_of_day(settings.close_time);
    let step = settings.slot_minutes;

    let mut out = Vec::new();
    let mut start = open;
    while let Some(end) = start.checked_add(step)
        && end <= close
    {
        let (Some(s), Some(e)) = (time_from_minutes(start), time_from_minutes(end)) else {
            break;
        };
        out.push(SlotInterval { start: s, end: e });
        start = end;
    }

    Ok(out)
}

/// Run `f` for every date, collecting each outcome. A failing date never
/// stops the remaining ones.
pub fn run_per_date<I, F>(dates: I, mut f: F) -> BatchReport
where
    I: IntoIterator<Item = NaiveDate>,
    F: FnMut(NaiveDate) -> AppResult<DateReport>,
{
    let outcomes = dates
        .into_iter()
        .map(|date| {
            let result = f(date);
            if let Err(e) = &result {
                tracing::warn!(%date, error = %e, "slot generation failed for date");
            }
            DateOutcome { date, result }
        })
        .collect();

    BatchReport { outcomes }
}

pub struct SlotGenerator;

impl SlotGenerator {
    /// Generate the slots of one date.
    ///
    /// Dates outside the settings' active days produce a `closed` report. A
    /// date that already has slots for this branch and benefit is left as is.
    /// The audit row is written after the commit; failing to write it is
    /// logged and does not change the result.
    pub fn generate_for_date(
        conn: &mut Connection,
        branch_id: &str,
        benefit: &BenefitType,
        date: NaiveDate,
        settings: &BenefitSettings,
    ) -> AppResult<DateReport> {
        if !settings.active_days.includes_date(date) {
            return Ok(DateReport {
                date,
                created: 0,
                existing: 0,
                closed: true,
            });
        }

        let report = Self::ensure_date(conn, branch_id, benefit.id, date, settings)?;

        if let Err(e) = audit(
            conn,
            "generate",
            &format!("{}/{}/{}", branch_id, benefit.code, date),
            &format!("{} slot(s) created, {} existing", report.created, report.existing),
        ) {
            tracing::warn!(%date, error = %e, "failed to write generation audit row");
        }

        Ok(report)
    }

    /// Generate every date in `[from, to]` whose weekday is in `days`
    /// (default: the settings' active days). Each date commits on its own.
    pub fn generate_range(
        conn: &mut Connection,
        branch_id: &str,
        benefit: &BenefitType,
        from: NaiveDate,
        to: NaiveDate,
        days: Option<Weekdays>,
        settings: &BenefitSettings,
    ) -> AppResult<BatchReport> {
        if to < from {
            return Err(AppError::InvalidDate(format!(
                "range end {} is before start {}",
                to, from
            )));
        }
        settings.validate()?;

        let filter = days.unwrap_or(settings.active_days);
        let dates = dates_between(from, to)
            .into_iter()
            .filter(|d| filter.includes_date(*d));

        let report = run_per_date(dates, |date| {
            Self::ensure_date(conn, branch_id, benefit.id, date, settings)
        });

        if let Err(e) = audit(
            conn,
            "generate",
            &format!("{}/{}/{}..{}", branch_id, benefit.code, from, to),
            &format!(
                "{}/{} date(s) ok, {} slot(s) created",
                report.succeeded(),
                report.total(),
                report.slots_created()
            ),
        ) {
            tracing::warn!(%from, %to, error = %e, "failed to write generation audit row");
        }

        Ok(report)
    }

    /// Take a slot out of (or back into) booking. Slots are never deleted;
    /// existing bookings keep their seats.
    pub fn set_active(conn: &Connection, slot_id: i64, active: bool) -> AppResult<BenefitSlot> {
        slots::set_active(conn, slot_id, active)?;
        let slot = slots::require_slot(conn, slot_id)?;

        audit(
            conn,
            if active { "slot_activate" } else { "slot_deactivate" },
            &format!("slot #{}", slot_id),
            &format!("{} ({} booked)", slot.label(), slot.booked_count),
        )?;

        Ok(slot)
    }

    fn ensure_date(
        conn: &mut Connection,
        branch_id: &str,
        benefit_type_id: i64,
        date: NaiveDate,
        settings: &BenefitSettings,
    ) -> AppResult<DateReport> {
        let intervals = intervals_for(settings)?;
        let tx = conn.transaction()?;

        let existing = slots::count_for_date(&tx, branch_id, benefit_type_id, &date)?;
        if existing > 0 {
            tracing::debug!(%date, existing, "date already has slots, skipping");
            return Ok(DateReport {
                date,
                created: 0,
                existing,
                closed: false,
            });
        }

        let mut created = 0;
        for iv in &intervals {
            if slots::insert_if_absent(
                &tx,
                branch_id,
                benefit_type_id,
                &date,
                &iv.start,
                &iv.end,
                settings.capacity,
            )? {
                created += 1;
            }
        }

        tx.commit()?;
        tracing::debug!(%date, created, "slots generated");

        Ok(DateReport {
            date,
            created,
            existing,
            closed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use crate::db::queries::benefit_types;
    use crate::utils::time::parse_time;

    fn settings(capacity: i64, minutes: i64, open: &str, close: &str) -> BenefitSettings {
        BenefitSettings {
            id: 0,
            branch_id: "main".into(),
            benefit_type_id: None,
            capacity,
            slot_minutes: minutes,
            open_time: parse_time(open).unwrap(),
            close_time: parse_time(close).unwrap(),
            active_days: Weekdays::all(),
            updated_at: String::new(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sauna(pool: &DbPool) -> BenefitType {
        benefit_types::insert_benefit_type(&pool.conn, "sauna", "Sauna", "🔥").unwrap();
        benefit_types::require_by_code(&pool.conn, "sauna").unwrap()
    }

    #[test]
    fn four_hour_window_yields_four_hourly_slots() {
        let ivs = intervals_for(&settings(5, 60, "06:00", "10:00")).unwrap();
        assert_eq!(ivs.len(), 4);
        assert_eq!(ivs[0].start, parse_time("06:00").unwrap());
        assert_eq!(ivs[3].end, parse_time("10:00").unwrap());
        for iv in &ivs {
            assert_eq!(minutes_of_day(iv.end) - minutes_of_day(iv.start), 60);
        }
    }

    #[test]
    fn trailing_partial_interval_is_dropped() {
        let ivs = intervals_for(&settings(5, 45, "06:00", "08:00")).unwrap();
        assert_eq!(ivs.len(), 2);
        assert_eq!(ivs[1].end, parse_time("07:30").unwrap());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(matches!(
            intervals_for(&settings(0, 60, "06:00", "10:00")),
            Err(AppError::InvalidSettings(_))
        ));
        assert!(matches!(
            intervals_for(&settings(5, 0, "06:00", "10:00")),
            Err(AppError::InvalidSettings(_))
        ));
        assert!(matches!(
            intervals_for(&settings(5, 60, "10:00", "10:00")),
            Err(AppError::InvalidSettings(_))
        ));
    }

    #[test]
    fn slot_longer_than_window_is_rejected() {
        assert!(matches!(
            intervals_for(&settings(5, i64::MAX, "06:00", "10:00")),
            Err(AppError::InvalidSettings(_))
        ));
        assert!(matches!(
            intervals_for(&settings(5, 241, "06:00", "10:00")),
            Err(AppError::InvalidSettings(_))
        ));
        let whole = intervals_for(&settings(5, 240, "06:00", "10:00")).unwrap();
        assert_eq!(whole.len(), 1);
        assert_eq!(whole[0].end, parse_time("10:00").unwrap());
    }

    #[test]
    fn generated_slots_carry_capacity() {
        let mut pool = DbPool::in_memory().unwrap();
        let benefit = sauna(&pool);
        let s = settings(5, 60, "06:00", "10:00");

        let report =
            SlotGenerator::generate_for_date(&mut pool.conn, "main", &benefit, d(2025, 9, 1), &s)
                .unwrap();
        assert_eq!(report.created, 4);

        let rows = slots::list_for_date(&pool.conn, &d(2025, 9, 1), Some("main"), None).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.capacity == 5 && r.booked_count == 0));
    }

    #[test]
    fn regeneration_never_exceeds_interval_count() {
        let mut pool = DbPool::in_memory().unwrap();
        let benefit = sauna(&pool);
        let date = d(2025, 9, 1);
        let s = settings(5, 60, "06:00", "10:00");

        SlotGenerator::generate_for_date(&mut pool.conn, "main", &benefit, date, &s).unwrap();
        let again =
            SlotGenerator::generate_for_date(&mut pool.conn, "main", &benefit, date, &s).unwrap();
        assert_eq!(again.created, 0);
        assert_eq!(again.existing, 4);

        // even with a different cut of the window
        let finer = settings(5, 30, "06:00", "10:00");
        SlotGenerator::generate_for_date(&mut pool.conn, "main", &benefit, date, &finer).unwrap();

        let n = slots::count_for_date(&pool.conn, "main", benefit.id, &date).unwrap();
        assert_eq!(n, 4);
    }

    #[test]
    fn closed_day_produces_nothing() {
        let mut pool = DbPool::in_memory().unwrap();
        let benefit = sauna(&pool);
        let mut s = settings(5, 60, "06:00", "10:00");
        s.active_days = Weekdays::mon_to_fri();

        // 2025-09-06 is a Saturday
        let report =
            SlotGenerator::generate_for_date(&mut pool.conn, "main", &benefit, d(2025, 9, 6), &s)
                .unwrap();
        assert!(report.closed);
        assert_eq!(report.created, 0);
    }

    #[test]
    fn range_respects_weekday_filter() {
        let mut pool = DbPool::in_memory().unwrap();
        let benefit = sauna(&pool);
        let s = settings(3, 60, "06:00", "08:00");

        // Mon 2025-09-01 .. Sun 2025-09-14
        let report = SlotGenerator::generate_range(
            &mut pool.conn,
            "main",
            &benefit,
            d(2025, 9, 1),
            d(2025, 9, 14),
            Some(Weekdays::mon_to_fri()),
            &s,
        )
        .unwrap();

        assert_eq!(report.total(), 10);
        assert_eq!(report.succeeded(), 10);
        assert_eq!(report.slots_created(), 20);
        let saturday = slots::list_for_date(&pool.conn, &d(2025, 9, 6), None, None).unwrap();
        assert!(saturday.is_empty());
    }

    #[test]
    fn batch_continues_past_failures() {
        let dates: Vec<NaiveDate> = (1..=7).map(|day| d(2025, 9, day)).collect();
        let failing = [d(2025, 9, 2), d(2025, 9, 5)];

        let mut seen = Vec::new();
        let report = run_per_date(dates.clone(), |date| {
            seen.push(date);
            if failing.contains(&date) {
                Err(AppError::Other(format!("store unavailable on {}", date)))
            } else {
                Ok(DateReport {
                    date,
                    created: 4,
                    existing: 0,
                    closed: false,
                })
            }
        });

        assert_eq!(seen, dates);
        assert_eq!(report.total(), 7);
        assert_eq!(report.succeeded(), 5);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.slots_created(), 20);
        let failed: Vec<NaiveDate> = report.failures().map(|(date, _)| date).collect();
        assert_eq!(failed, failing.to_vec());
    }

    #[test]
    fn reversed_range_is_rejected() {
        let mut pool = DbPool::in_memory().unwrap();
        let benefit = sauna(&pool);
        let s = settings(3, 60, "06:00", "08:00");
        let res = SlotGenerator::generate_range(
            &mut pool.conn,
            "main",
            &benefit,
            d(2025, 9, 10),
            d(2025, 9, 1),
            None,
            &s,
        );
        assert!(matches!(res, Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn deactivated_slot_is_kept() {
        let mut pool = DbPool::in_memory().unwrap();
        let benefit = sauna(&pool);
        let s = settings(3, 60, "06:00", "08:00");
        SlotGenerator::generate_for_date(&mut pool.conn, "main", &benefit, d(2025, 9, 1), &s)
            .unwrap();
        let first = slots::list_for_date(&pool.conn, &d(2025, 9, 1), None, None).unwrap()[0].id;

        let slot = SlotGenerator::set_active(&pool.conn, first, false).unwrap();
        assert!(!slot.is_active);
        assert_eq!(
            slots::list_for_date(&pool.conn, &d(2025, 9, 1), None, None).unwrap().len(),
            2
        );

        assert!(SlotGenerator::set_active(&pool.conn, first, true).unwrap().is_active);
        assert!(matches!(
            SlotGenerator::set_active(&pool.conn, 999, false),
            Err(AppError::SlotNotFound(999))
        ));
    }

    #[test]
    fn committed_generation_survives_a_broken_audit_log() {
        let mut pool = DbPool::in_memory().unwrap();
        let benefit = sauna(&pool);
        let s = settings(3, 60, "06:00", "08:00");
        pool.conn.execute_batch("DROP TABLE log;").unwrap();

        let day =
            SlotGenerator::generate_for_date(&mut pool.conn, "main", &benefit, d(2025, 9, 1), &s)
                .unwrap();
        assert_eq!(day.created, 2);

        let report = SlotGenerator::generate_range(
            &mut pool.conn,
            "main",
            &benefit,
            d(2025, 9, 2),
            d(2025, 9, 4),
            None,
            &s,
        )
        .unwrap();
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.slots_created(), 6);

        let n = slots::count_for_date(&pool.conn, "main", benefit.id, &d(2025, 9, 4)).unwrap();
        assert_eq!(n, 2);
    }
}
