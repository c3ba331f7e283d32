use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::booking_ledger::BookingLedger;
use crate::domain::services::pricing::PricingResolver;
use crate::domain::services::slot_generator::SlotGenerator;
use crate::infra::repositories::{
    sqlite_booking_repo::SqliteBookingRepo, sqlite_client_repo::SqliteClientRepo,
    sqlite_currency_repo::SqliteCurrencyRepo, sqlite_duration_repo::SqliteDurationRepo,
    sqlite_package_repo::SqlitePackageRepo, sqlite_payment_method_repo::SqlitePaymentMethodRepo,
    sqlite_slot_repo::SqliteSlotRepo, sqlite_template_repo::SqliteTemplateRepo,
    sqlite_user_package_repo::SqliteUserPackageRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    build_state(config, pool)
}

pub fn build_state(config: &Config, pool: SqlitePool) -> AppState {
    let duration_repo = Arc::new(SqliteDurationRepo::new(pool.clone()));
    let template_repo = Arc::new(SqliteTemplateRepo::new(pool.clone()));
    let slot_repo = Arc::new(SqliteSlotRepo::new(pool.clone()));
    let package_repo = Arc::new(SqlitePackageRepo::new(pool.clone()));
    let user_package_repo = Arc::new(SqliteUserPackageRepo::new(pool.clone()));
    let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
    let client_registry = Arc::new(SqliteClientRepo::new(pool.clone()));
    let currency_repo = Arc::new(SqliteCurrencyRepo::new(pool.clone()));
    let payment_policy = Arc::new(SqlitePaymentMethodRepo::new(pool.clone()));

    let pricing = Arc::new(PricingResolver::new(
        package_repo.clone(),
        currency_repo.clone(),
        config.default_currency.clone(),
    ));
    let slot_generator = Arc::new(SlotGenerator::new(
        template_repo.clone(),
        slot_repo.clone(),
        config.max_generation_days,
    ));
    let booking_ledger = Arc::new(BookingLedger::new(
        booking_repo.clone(),
        slot_repo.clone(),
        user_package_repo.clone(),
        package_repo.clone(),
        client_registry.clone(),
        payment_policy.clone(),
        pricing.clone(),
    ));

    AppState {
        config: config.clone(),
        duration_repo,
        template_repo,
        slot_repo,
        package_repo,
        user_package_repo,
        booking_repo,
        client_registry,
        currency_repo,
        payment_policy,
        slot_generator,
        booking_ledger,
        pricing,
    }
}

pub async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
