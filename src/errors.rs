//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError so that every workflow
//! hands a typed result back to the caller, which decides how to present it.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid weekday set: {0}")]
    InvalidWeekdays(String),

    #[error("Invalid allotment period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    // ---------------------------
    // Slot generation
    // ---------------------------
    #[error("Invalid benefit settings: {0}")]
    InvalidSettings(String),

    #[error("No benefit settings for branch '{branch}' and benefit '{benefit}'")]
    SettingsNotFound { branch: String, benefit: String },

    #[error("Benefit type not found: {0}")]
    BenefitTypeNotFound(String),

    #[error("Benefit type already exists: {0}")]
    BenefitTypeExists(String),

    // ---------------------------
    // Booking workflow
    // ---------------------------
    #[error("Slot not found: #{0}")]
    SlotNotFound(i64),

    #[error("Slot #{0} is not active")]
    SlotInactive(i64),

    #[error("Slot #{slot_id} is full ({booked}/{capacity})")]
    SlotFull {
        slot_id: i64,
        booked: i64,
        capacity: i64,
    },

    #[error("Member '{member}' already holds booking #{booking_id} on slot #{slot_id}")]
    DuplicateBooking {
        member: String,
        slot_id: i64,
        booking_id: i64,
    },

    #[error("Booking not found: #{0}")]
    BookingNotFound(i64),

    #[error("Booking #{id} cannot move from '{from}' to '{to}'")]
    InvalidTransition { id: i64, from: String, to: String },

    // ---------------------------
    // Memberships / usage
    // ---------------------------
    #[error("Membership not found: {0}")]
    MembershipNotFound(String),

    #[error("Not eligible: {0}")]
    NotEligible(String),

    #[error("Allotment exhausted for membership #{membership_id}: {used}/{allowance} used this {period}")]
    AllotmentExhausted {
        membership_id: i64,
        used: i64,
        allowance: i64,
        period: String,
    },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
