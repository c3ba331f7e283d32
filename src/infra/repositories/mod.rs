pub mod sqlite_booking_repo;
pub mod sqlite_client_repo;
pub mod sqlite_currency_repo;
pub mod sqlite_duration_repo;
pub mod sqlite_package_repo;
pub mod sqlite_payment_method_repo;
pub mod sqlite_slot_repo;
pub mod sqlite_template_repo;
pub mod sqlite_user_package_repo;
