pub mod booking;
pub mod client;
pub mod currency;
pub mod duration;
pub mod package;
pub mod schedule;
pub mod slot;
pub mod user_package;
