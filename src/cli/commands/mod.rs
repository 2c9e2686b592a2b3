pub mod attend;
pub mod backup;
pub mod benefit;
pub mod book;
pub mod bookings;
pub mod cancel;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod log;
pub mod membership;
pub mod settings;
pub mod slots;
pub mod usage;
