use crate::domain::models::schedule::ScheduleTemplate;
use crate::domain::ports::ScheduleTemplateRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteTemplateRepo {
    pool: SqlitePool,
}

impl SqliteTemplateRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleTemplateRepository for SqliteTemplateRepo {
    async fn create(&self, template: &ScheduleTemplate) -> Result<ScheduleTemplate, AppError> {
        sqlx::query_as::<_, ScheduleTemplate>(
            "INSERT INTO schedule_templates (id, day_of_week, start_time, end_time, capacity,
                session_duration_id, is_available, auto_available, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&template.id)
        .bind(&template.day_of_week)
        .bind(&template.start_time)
        .bind(&template.end_time)
        .bind(template.capacity)
        .bind(&template.session_duration_id)
        .bind(template.is_available)
        .bind(template.auto_available)
        .bind(template.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ScheduleTemplate>, AppError> {
        sqlx::query_as::<_, ScheduleTemplate>("SELECT * FROM schedule_templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_many(&self, ids: &[String]) -> Result<Vec<ScheduleTemplate>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT * FROM schedule_templates WHERE id IN ({})", placeholders);

        let mut query = sqlx::query_as::<_, ScheduleTemplate>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<ScheduleTemplate>, AppError> {
        sqlx::query_as::<_, ScheduleTemplate>(
            "SELECT * FROM schedule_templates ORDER BY day_of_week, start_time",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, template: &ScheduleTemplate) -> Result<ScheduleTemplate, AppError> {
        sqlx::query_as::<_, ScheduleTemplate>(
            "UPDATE schedule_templates
             SET day_of_week = ?, start_time = ?, end_time = ?, capacity = ?,
                 session_duration_id = ?, is_available = ?, auto_available = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&template.day_of_week)
        .bind(&template.start_time)
        .bind(&template.end_time)
        .bind(template.capacity)
        .bind(&template.session_duration_id)
        .bind(template.is_available)
        .bind(template.auto_available)
        .bind(&template.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Schedule template not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM bookings b
             JOIN schedule_slots s ON s.id = b.schedule_slot_id
             WHERE s.schedule_template_id = ? AND b.status IN ('pending', 'confirmed')",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;
        let active: i64 = row.get("count");
        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Template has {} active bookings on its slots",
                active
            )));
        }

        sqlx::query("DELETE FROM schedule_slots WHERE schedule_template_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM schedule_templates WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Schedule template not found".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
