use crate::domain::models::user_package::{SessionPool, UserPackage};
use crate::domain::ports::UserPackageRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteUserPackageRepo {
    pool: SqlitePool,
}

impl SqliteUserPackageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn pool_columns(pool: SessionPool) -> (&'static str, &'static str) {
    match pool {
        SessionPool::Individual => ("sessions_remaining", "sessions_used"),
        SessionPool::Group => ("group_sessions_remaining", "group_sessions_used"),
    }
}

#[async_trait]
impl UserPackageRepository for SqliteUserPackageRepo {
    async fn create(&self, package: &UserPackage) -> Result<UserPackage, AppError> {
        sqlx::query_as::<_, UserPackage>(
            "INSERT INTO user_packages (id, client_id, package_definition_id, sessions_total,
                sessions_remaining, sessions_used, group_sessions_total, group_sessions_remaining,
                group_sessions_used, is_active, expires_at, purchased_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&package.id)
        .bind(&package.client_id)
        .bind(&package.package_definition_id)
        .bind(package.sessions_total)
        .bind(package.sessions_remaining)
        .bind(package.sessions_used)
        .bind(package.group_sessions_total)
        .bind(package.group_sessions_remaining)
        .bind(package.group_sessions_used)
        .bind(package.is_active)
        .bind(package.expires_at)
        .bind(package.purchased_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserPackage>, AppError> {
        sqlx::query_as::<_, UserPackage>("SELECT * FROM user_packages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<UserPackage>, AppError> {
        sqlx::query_as::<_, UserPackage>(
            "SELECT * FROM user_packages WHERE client_id = ? ORDER BY purchased_at DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_auto_assignable(
        &self,
        client_id: &str,
        pool: SessionPool,
    ) -> Result<Option<UserPackage>, AppError> {
        let (remaining_col, _) = pool_columns(pool);
        let sql = format!(
            "SELECT * FROM user_packages
             WHERE client_id = ? AND is_active = 1 AND {} > 0
               AND (expires_at IS NULL OR expires_at > ?)
             ORDER BY purchased_at DESC
             LIMIT 1",
            remaining_col
        );
        sqlx::query_as::<_, UserPackage>(&sql)
            .bind(client_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn reserve(&self, id: &str, pool: SessionPool, amount: i32) -> Result<(), AppError> {
        if amount < 1 {
            return Err(AppError::Validation("Reserve amount must be positive".into()));
        }
        let (remaining_col, used_col) = pool_columns(pool);
        let sql = format!(
            "UPDATE user_packages SET {rem} = {rem} - ?, {used} = {used} + ?
             WHERE id = ? AND is_active = 1 AND {rem} >= ?",
            rem = remaining_col,
            used = used_col
        );
        let result = sqlx::query(&sql)
            .bind(amount)
            .bind(amount)
            .bind(id)
            .bind(amount)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                None => Err(AppError::NotFound("User package not found".into())),
                Some(_) => Err(AppError::InsufficientSessions(
                    "No sessions remaining in the package".into(),
                )),
            };
        }
        Ok(())
    }

    async fn release(&self, id: &str, pool: SessionPool, amount: i32) -> Result<(), AppError> {
        if amount < 1 {
            return Err(AppError::Validation("Release amount must be positive".into()));
        }
        let (remaining_col, used_col) = pool_columns(pool);
        // Capped at the used counter: releasing more than was ever reserved
        // is a no-op beyond the cap, never an overflow.
        let sql = format!(
            "UPDATE user_packages SET {rem} = {rem} + MIN(?, {used}), {used} = {used} - MIN(?, {used})
             WHERE id = ?",
            rem = remaining_col,
            used = used_col
        );
        let result = sqlx::query(&sql)
            .bind(amount)
            .bind(amount)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User package not found".into()));
        }
        Ok(())
    }
}
