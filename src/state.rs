use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, ClientRegistry, CurrencyRepository, PackageRepository,
    PaymentMethodPolicy, ScheduleSlotRepository, ScheduleTemplateRepository,
    SessionDurationRepository, UserPackageRepository,
};
use crate::domain::services::booking_ledger::BookingLedger;
use crate::domain::services::pricing::PricingResolver;
use crate::domain::services::slot_generator::SlotGenerator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub duration_repo: Arc<dyn SessionDurationRepository>,
    pub template_repo: Arc<dyn ScheduleTemplateRepository>,
    pub slot_repo: Arc<dyn ScheduleSlotRepository>,
    pub package_repo: Arc<dyn PackageRepository>,
    pub user_package_repo: Arc<dyn UserPackageRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub client_registry: Arc<dyn ClientRegistry>,
    pub currency_repo: Arc<dyn CurrencyRepository>,
    pub payment_policy: Arc<dyn PaymentMethodPolicy>,
    pub slot_generator: Arc<SlotGenerator>,
    pub booking_ledger: Arc<BookingLedger>,
    pub pricing: Arc<PricingResolver>,
}
