use crate::domain::models::{
    booking::{Booking, BookingStatus},
    client::Client,
    currency::Currency,
    duration::SessionDuration,
    package::{PackageDefinition, PackagePrice},
    schedule::ScheduleTemplate,
    slot::ScheduleSlot,
    user_package::{SessionPool, UserPackage},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Typed filter for slot listings.
#[derive(Debug, Default, Clone)]
pub struct SlotFilter {
    pub schedule_template_id: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub is_available: Option<bool>,
    pub page: i64,
    pub limit: i64,
}

/// Typed filter for booking listings. Date bounds apply to the booked
/// slot's start time.
#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub client_id: Option<String>,
    pub schedule_slot_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub page: i64,
    pub limit: i64,
}

#[async_trait]
pub trait SessionDurationRepository: Send + Sync {
    async fn create(&self, duration: &SessionDuration) -> Result<SessionDuration, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<SessionDuration>, AppError>;
    async fn list(&self) -> Result<Vec<SessionDuration>, AppError>;
    async fn update(&self, duration: &SessionDuration) -> Result<SessionDuration, AppError>;
    /// Soft delete. Rejected with Conflict while the duration is referenced
    /// by an available template or active package definition.
    async fn deactivate(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScheduleTemplateRepository: Send + Sync {
    async fn create(&self, template: &ScheduleTemplate) -> Result<ScheduleTemplate, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ScheduleTemplate>, AppError>;
    async fn find_many(&self, ids: &[String]) -> Result<Vec<ScheduleTemplate>, AppError>;
    async fn list(&self) -> Result<Vec<ScheduleTemplate>, AppError>;
    async fn update(&self, template: &ScheduleTemplate) -> Result<ScheduleTemplate, AppError>;
    /// Deletes the template and its generated slots. Rejected with Conflict
    /// if any of those slots carries active bookings.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScheduleSlotRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<ScheduleSlot>, AppError>;
    async fn list(&self, filter: &SlotFilter) -> Result<Vec<ScheduleSlot>, AppError>;
    async fn count(&self, filter: &SlotFilter) -> Result<i64, AppError>;
    /// Existing slots of the given templates in [start, end), paired with
    /// their active (pending/confirmed) booking count.
    async fn list_for_generation(
        &self,
        template_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(ScheduleSlot, i64)>, AppError>;
    /// Applies one generation run atomically: deletes the replaced slots,
    /// inserts the new ones. All-or-nothing.
    async fn apply_generation(
        &self,
        delete_ids: &[String],
        new_slots: &[ScheduleSlot],
    ) -> Result<(), AppError>;
    async fn set_availability(&self, id: &str, is_available: bool) -> Result<ScheduleSlot, AppError>;
}

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create_definition(&self, definition: &PackageDefinition) -> Result<PackageDefinition, AppError>;
    async fn find_definition(&self, id: &str) -> Result<Option<PackageDefinition>, AppError>;
    async fn list_definitions(&self) -> Result<Vec<PackageDefinition>, AppError>;
    async fn update_definition(&self, definition: &PackageDefinition) -> Result<PackageDefinition, AppError>;
    async fn upsert_price(&self, price: &PackagePrice) -> Result<PackagePrice, AppError>;
    async fn find_price(
        &self,
        package_definition_id: &str,
        currency_code: &str,
    ) -> Result<Option<PackagePrice>, AppError>;
    async fn list_prices(&self, package_definition_id: &str) -> Result<Vec<PackagePrice>, AppError>;
}

/// The per-purchase session ledger. Reserve and release are single
/// conditional updates so concurrent bookings can never drive a pool
/// negative or past its original size.
#[async_trait]
pub trait UserPackageRepository: Send + Sync {
    async fn create(&self, package: &UserPackage) -> Result<UserPackage, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<UserPackage>, AppError>;
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<UserPackage>, AppError>;
    /// Most recently purchased active package with balance in the pool.
    async fn find_auto_assignable(
        &self,
        client_id: &str,
        pool: SessionPool,
    ) -> Result<Option<UserPackage>, AppError>;
    async fn reserve(&self, id: &str, pool: SessionPool, amount: i32) -> Result<(), AppError>;
    async fn release(&self, id: &str, pool: SessionPool, amount: i32) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking, increments the slot's booked count and reserves
    /// the package sessions in one transaction. Fails with SlotUnavailable,
    /// SlotFull or InsufficientSessions without committing anything.
    async fn create_reserved(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError>;
    async fn count(&self, filter: &BookingFilter) -> Result<i64, AppError>;
    /// Persists the booking's status fields, guarded on the row still being
    /// in `from`: a concurrent transition that got there first makes this
    /// one fail with Conflict. When `release` is set, the slot seats and
    /// reserved sessions are given back in the same transaction.
    async fn transition(
        &self,
        booking: &Booking,
        from: BookingStatus,
        release: bool,
    ) -> Result<Booking, AppError>;
    /// Removes the row. Seats and sessions are released only when the row
    /// deleted was still in an active status, so a delete racing a cancel
    /// cannot restore them twice.
    async fn delete(&self, booking: &Booking) -> Result<(), AppError>;
}

/// External collaborator: who is booking. Only the lookup is consumed by
/// the engine; create/list exist for administration.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    async fn create(&self, client: &Client) -> Result<Client, AppError>;
    async fn lookup(&self, id: &str) -> Result<Option<Client>, AppError>;
    async fn list(&self) -> Result<Vec<Client>, AppError>;
}

#[async_trait]
pub trait CurrencyRepository: Send + Sync {
    async fn create(&self, currency: &Currency) -> Result<Currency, AppError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Currency>, AppError>;
    async fn list(&self) -> Result<Vec<Currency>, AppError>;
}

/// External collaborator: payment-method policy. Unknown methods require
/// confirmation and never auto-assign.
#[async_trait]
pub trait PaymentMethodPolicy: Send + Sync {
    async fn requires_confirmation(&self, method: &str) -> Result<bool, AppError>;
    async fn auto_assign_package(&self, method: &str) -> Result<bool, AppError>;
}
