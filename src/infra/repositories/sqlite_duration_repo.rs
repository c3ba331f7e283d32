use crate::domain::models::duration::SessionDuration;
use crate::domain::ports::SessionDurationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteDurationRepo {
    pool: SqlitePool,
}

impl SqliteDurationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionDurationRepository for SqliteDurationRepo {
    async fn create(&self, duration: &SessionDuration) -> Result<SessionDuration, AppError> {
        sqlx::query_as::<_, SessionDuration>(
            "INSERT INTO session_durations (id, name, minutes, is_active, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&duration.id)
        .bind(&duration.name)
        .bind(duration.minutes)
        .bind(duration.is_active)
        .bind(duration.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<SessionDuration>, AppError> {
        sqlx::query_as::<_, SessionDuration>("SELECT * FROM session_durations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<SessionDuration>, AppError> {
        sqlx::query_as::<_, SessionDuration>(
            "SELECT * FROM session_durations ORDER BY minutes ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, duration: &SessionDuration) -> Result<SessionDuration, AppError> {
        sqlx::query_as::<_, SessionDuration>(
            "UPDATE session_durations SET name = ?, minutes = ?, is_active = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&duration.name)
        .bind(duration.minutes)
        .bind(duration.is_active)
        .bind(&duration.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Session duration not found".into()))
    }

    async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let row = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM schedule_templates
                 WHERE session_duration_id = ? AND is_available = 1) AS templates,
                (SELECT COUNT(*) FROM package_definitions
                 WHERE session_duration_id = ? AND is_active = 1) AS packages",
        )
        .bind(id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let templates: i64 = row.get("templates");
        let packages: i64 = row.get("packages");
        if templates > 0 || packages > 0 {
            return Err(AppError::Conflict(format!(
                "Duration is referenced by {} templates and {} packages",
                templates, packages
            )));
        }

        let result = sqlx::query("UPDATE session_durations SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Session duration not found".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
