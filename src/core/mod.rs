pub mod attendance;
pub mod backup;
pub mod booking;
pub mod catalog;
pub mod export;
pub mod generator;
pub mod log;
pub mod membership;

#[cfg(test)]
pub(crate) mod test_support;
