use crate::domain::ports::PaymentMethodPolicy;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

/// Policy lookups against the `payment_methods` table. Methods the table
/// does not know require confirmation and never auto-assign a package.
pub struct SqlitePaymentMethodRepo {
    pool: SqlitePool,
}

impl SqlitePaymentMethodRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn flags(&self, method: &str) -> Result<Option<(bool, bool)>, AppError> {
        let row = sqlx::query(
            "SELECT auto_confirm, auto_assign_package FROM payment_methods WHERE name = ?",
        )
        .bind(method)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row.map(|r| (r.get::<bool, _>("auto_confirm"), r.get::<bool, _>("auto_assign_package"))))
    }
}

#[async_trait]
impl PaymentMethodPolicy for SqlitePaymentMethodRepo {
    async fn requires_confirmation(&self, method: &str) -> Result<bool, AppError> {
        Ok(match self.flags(method).await? {
            Some((auto_confirm, _)) => !auto_confirm,
            None => true,
        })
    }

    async fn auto_assign_package(&self, method: &str) -> Result<bool, AppError> {
        Ok(match self.flags(method).await? {
            Some((_, auto_assign)) => auto_assign,
            None => false,
        })
    }
}
