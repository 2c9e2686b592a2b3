pub mod benefit_type;
pub mod booking;
pub mod booking_status;
pub mod membership;
pub mod settings;
pub mod slot;
pub mod usage;
pub mod weekdays;
