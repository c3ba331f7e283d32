use crate::domain::models::package::{PackageDefinition, PackagePrice};
use crate::domain::ports::PackageRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePackageRepo {
    pool: SqlitePool,
}

impl SqlitePackageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PackageRepository for SqlitePackageRepo {
    async fn create_definition(&self, definition: &PackageDefinition) -> Result<PackageDefinition, AppError> {
        sqlx::query_as::<_, PackageDefinition>(
            "INSERT INTO package_definitions (id, name, description, sessions_count,
                session_duration_id, package_type, max_group_size, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&definition.id)
        .bind(&definition.name)
        .bind(&definition.description)
        .bind(definition.sessions_count)
        .bind(&definition.session_duration_id)
        .bind(definition.package_type)
        .bind(definition.max_group_size)
        .bind(definition.is_active)
        .bind(definition.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_definition(&self, id: &str) -> Result<Option<PackageDefinition>, AppError> {
        sqlx::query_as::<_, PackageDefinition>("SELECT * FROM package_definitions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_definitions(&self) -> Result<Vec<PackageDefinition>, AppError> {
        sqlx::query_as::<_, PackageDefinition>(
            "SELECT * FROM package_definitions ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update_definition(&self, definition: &PackageDefinition) -> Result<PackageDefinition, AppError> {
        sqlx::query_as::<_, PackageDefinition>(
            "UPDATE package_definitions
             SET name = ?, description = ?, sessions_count = ?, session_duration_id = ?,
                 package_type = ?, max_group_size = ?, is_active = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&definition.name)
        .bind(&definition.description)
        .bind(definition.sessions_count)
        .bind(&definition.session_duration_id)
        .bind(definition.package_type)
        .bind(definition.max_group_size)
        .bind(definition.is_active)
        .bind(&definition.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Package definition not found".into()))
    }

    async fn upsert_price(&self, price: &PackagePrice) -> Result<PackagePrice, AppError> {
        sqlx::query_as::<_, PackagePrice>(
            "INSERT INTO package_prices (id, package_definition_id, currency_code, price,
                pricing_mode, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (package_definition_id, currency_code)
             DO UPDATE SET price = excluded.price, pricing_mode = excluded.pricing_mode
             RETURNING *",
        )
        .bind(&price.id)
        .bind(&price.package_definition_id)
        .bind(&price.currency_code)
        .bind(price.price)
        .bind(price.pricing_mode)
        .bind(price.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_price(
        &self,
        package_definition_id: &str,
        currency_code: &str,
    ) -> Result<Option<PackagePrice>, AppError> {
        sqlx::query_as::<_, PackagePrice>(
            "SELECT * FROM package_prices WHERE package_definition_id = ? AND currency_code = ?",
        )
        .bind(package_definition_id)
        .bind(currency_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_prices(&self, package_definition_id: &str) -> Result<Vec<PackagePrice>, AppError> {
        sqlx::query_as::<_, PackagePrice>(
            "SELECT * FROM package_prices WHERE package_definition_id = ? ORDER BY currency_code",
        )
        .bind(package_definition_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
