use crate::domain::models::currency::Currency;
use crate::domain::ports::CurrencyRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCurrencyRepo {
    pool: SqlitePool,
}

impl SqliteCurrencyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CurrencyRepository for SqliteCurrencyRepo {
    async fn create(&self, currency: &Currency) -> Result<Currency, AppError> {
        sqlx::query_as::<_, Currency>(
            "INSERT INTO currencies (id, code, name, symbol, exchange_rate, is_default, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&currency.id)
        .bind(&currency.code)
        .bind(&currency.name)
        .bind(&currency.symbol)
        .bind(currency.exchange_rate)
        .bind(currency.is_default)
        .bind(currency.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Currency>, AppError> {
        sqlx::query_as::<_, Currency>("SELECT * FROM currencies WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Currency>, AppError> {
        sqlx::query_as::<_, Currency>("SELECT * FROM currencies ORDER BY code")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
