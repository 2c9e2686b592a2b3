//! Booking workflow: checked self/staff bookings, concierge force adds and
//! cancellations. Each call runs in one SQLite transaction.

use crate::db::log::audit;
use crate::db::queries::{bookings, memberships, slots};
use crate::errors::{AppError, AppResult};
use crate::models::booking::BenefitBooking;
use crate::models::booking_status::BookingStatus;
use crate::models::membership::Membership;
use crate::models::slot::BenefitSlot;
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone)]
pub struct BookingRequest<'a> {
    pub slot_id: i64,
    pub member_id: &'a str,
    /// Membership to book under; when `None` the member's valid membership
    /// on the slot date is looked up.
    pub membership_id: Option<i64>,
    /// Concierge override: skip availability, eligibility and duplicate checks.
    pub force: bool,
    pub source: &'a str,
    pub notes: &'a str,
}

#[derive(Debug, Clone)]
pub struct BookingReceipt {
    pub booking: BenefitBooking,
    /// Slot as it stands after the booking.
    pub slot: BenefitSlot,
}

impl BookingReceipt {
    pub fn over_capacity(&self) -> bool {
        self.slot.is_over_capacity()
    }
}

pub struct BookingLogic;

impl BookingLogic {
    /// Entry point for both paths; `req.force` selects the concierge override.
    pub fn book(conn: &mut Connection, req: &BookingRequest) -> AppResult<BookingReceipt> {
        if req.force {
            Self::force_add(conn, req)
        } else {
            Self::book_checked(conn, req)
        }
    }

    fn book_checked(conn: &mut Connection, req: &BookingRequest) -> AppResult<BookingReceipt> {
        let tx = conn.transaction()?;

        let slot = slots::require_slot(&tx, req.slot_id)?;
        if !slot.is_active {
            return Err(AppError::SlotInactive(slot.id));
        }

        let membership = eligible_membership(&tx, req, &slot)?;

        if let Some(existing) = bookings::find_seat_holder(&tx, slot.id, req.member_id)? {
            return Err(AppError::DuplicateBooking {
                member: req.member_id.to_string(),
                slot_id: slot.id,
                booking_id: existing.id,
            });
        }

        if !slots::try_take_seat(&tx, slot.id)? {
            let current = slots::require_slot(&tx, slot.id)?;
            tracing::debug!(slot = slot.id, booked = current.booked_count, "slot full");
            return Err(AppError::SlotFull {
                slot_id: current.id,
                booked: current.booked_count,
                capacity: current.capacity,
            });
        }

        let receipt = insert_and_reload(&tx, req, Some(membership.id), false)?;

        audit(
            &tx,
            "book",
            &format!("booking #{}", receipt.booking.id),
            &format!(
                "{} booked slot #{} ({}) [{}/{}]",
                req.member_id,
                slot.id,
                slot.label(),
                receipt.slot.booked_count,
                receipt.slot.capacity
            ),
        )?;

        tx.commit()?;
        tracing::info!(
            booking = receipt.booking.id,
            slot = slot.id,
            member = req.member_id,
            "booking created"
        );
        Ok(receipt)
    }

    /// Concierge booking: only the slot must exist. Capacity, the active flag,
    /// membership validity and duplicates are all ignored, and the booking is
    /// flagged `forced` in the audit log.
    pub fn force_add(conn: &mut Connection, req: &BookingRequest) -> AppResult<BookingReceipt> {
        let tx = conn.transaction()?;

        let slot = slots::require_slot(&tx, req.slot_id)?;
        if let Some(id) = req.membership_id {
            memberships::require_membership(&tx, id)?;
        }

        slots::force_take_seat(&tx, slot.id)?;
        let receipt = insert_and_reload(&tx, req, req.membership_id, true)?;

        audit(
            &tx,
            "force_add",
            &format!("booking #{}", receipt.booking.id),
            &format!(
                "{} force-added to slot #{} ({}) [{}/{}]{}",
                req.member_id,
                slot.id,
                slot.label(),
                receipt.slot.booked_count,
                receipt.slot.capacity,
                if req.notes.is_empty() {
                    String::new()
                } else {
                    format!(" note: {}", req.notes)
                }
            ),
        )?;

        tx.commit()?;

        if receipt.over_capacity() {
            tracing::warn!(
                slot = slot.id,
                booked = receipt.slot.booked_count,
                capacity = receipt.slot.capacity,
                "force add pushed slot over capacity"
            );
        }
        Ok(receipt)
    }

    /// `booked → cancelled`, giving the seat back.
    pub fn cancel(conn: &mut Connection, booking_id: i64) -> AppResult<BenefitBooking> {
        let tx = conn.transaction()?;

        let booking = bookings::require_booking(&tx, booking_id)?;
        let next = BookingStatus::Cancelled;
        if booking.status.is_terminal()
            || !bookings::transition_status(&tx, booking_id, BookingStatus::Booked, next)?
        {
            return Err(AppError::InvalidTransition {
                id: booking_id,
                from: booking.status.to_string(),
                to: next.to_string(),
            });
        }

        slots::release_seat(&tx, booking.slot_id)?;
        audit(
            &tx,
            "cancel",
            &format!("booking #{}", booking_id),
            &format!("{} cancelled slot #{}", booking.member_id, booking.slot_id),
        )?;

        let updated = bookings::require_booking(&tx, booking_id)?;
        tx.commit()?;
        Ok(updated)
    }
}

/// Membership the booking is made under, or `NotEligible`.
fn eligible_membership(
    tx: &Transaction,
    req: &BookingRequest,
    slot: &BenefitSlot,
) -> AppResult<Membership> {
    match req.membership_id {
        Some(id) => {
            let m = memberships::require_membership(tx, id)?;
            if m.member_id != req.member_id {
                return Err(AppError::NotEligible(format!(
                    "membership #{} belongs to '{}', not '{}'",
                    id, m.member_id, req.member_id
                )));
            }
            if !m.is_valid_on(slot.slot_date) {
                return Err(AppError::NotEligible(format!(
                    "membership #{} ({}) is not valid on {}",
                    id, m.status, slot.slot_date
                )));
            }
            Ok(m)
        }
        None => memberships::find_valid_for_member(tx, req.member_id, &slot.slot_date)?
            .ok_or_else(|| {
                AppError::NotEligible(format!(
                    "'{}' has no valid membership on {}",
                    req.member_id, slot.slot_date
                ))
            }),
    }
}

fn insert_and_reload(
    tx: &Transaction,
    req: &BookingRequest,
    membership_id: Option<i64>,
    forced: bool,
) -> AppResult<BookingReceipt> {
    let new = BenefitBooking::new(
        req.slot_id,
        req.member_id,
        membership_id,
        forced,
        req.source,
        req.notes,
    );
    let id = bookings::insert_booking(tx, &new)?;

    Ok(BookingReceipt {
        booking: bookings::require_booking(tx, id)?,
        slot: slots::require_slot(tx, req.slot_id)?,
    })
}
