pub mod booking_ledger;
pub mod pricing;
pub mod slot_generator;
