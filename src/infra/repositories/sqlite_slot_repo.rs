use crate::domain::models::slot::ScheduleSlot;
use crate::domain::ports::{ScheduleSlotRepository, SlotFilter};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Sqlite, SqlitePool};

pub struct SqliteSlotRepo {
    pool: SqlitePool,
}

impl SqliteSlotRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OccupiedSlotRow {
    #[sqlx(flatten)]
    slot: ScheduleSlot,
    active_bookings: i64,
}

fn filter_clauses(filter: &SlotFilter, sql: &mut String) {
    if filter.schedule_template_id.is_some() {
        sql.push_str(" AND schedule_template_id = ?");
    }
    if filter.date_from.is_some() {
        sql.push_str(" AND start_time >= ?");
    }
    if filter.date_to.is_some() {
        sql.push_str(" AND start_time <= ?");
    }
    if filter.is_available.is_some() {
        sql.push_str(" AND is_available = ?");
    }
}

fn bind_filter<'q, O>(
    mut query: sqlx::query::QueryAs<'q, Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    filter: &'q SlotFilter,
) -> sqlx::query::QueryAs<'q, Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
    if let Some(template_id) = &filter.schedule_template_id {
        query = query.bind(template_id);
    }
    if let Some(from) = filter.date_from {
        query = query.bind(from);
    }
    if let Some(to) = filter.date_to {
        query = query.bind(to);
    }
    if let Some(is_available) = filter.is_available {
        query = query.bind(is_available);
    }
    query
}

#[async_trait]
impl ScheduleSlotRepository for SqliteSlotRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<ScheduleSlot>, AppError> {
        sqlx::query_as::<_, ScheduleSlot>("SELECT * FROM schedule_slots WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &SlotFilter) -> Result<Vec<ScheduleSlot>, AppError> {
        let mut sql = String::from("SELECT * FROM schedule_slots WHERE 1 = 1");
        filter_clauses(filter, &mut sql);
        sql.push_str(" ORDER BY start_time ASC LIMIT ? OFFSET ?");

        bind_filter(sqlx::query_as::<_, ScheduleSlot>(&sql), filter)
            .bind(filter.limit)
            .bind((filter.page - 1) * filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self, filter: &SlotFilter) -> Result<i64, AppError> {
        let mut sql = String::from("SELECT COUNT(*) as count FROM schedule_slots WHERE 1 = 1");
        filter_clauses(filter, &mut sql);

        let row = bind_filter(sqlx::query_as::<_, (i64,)>(&sql), filter)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.0)
    }

    async fn list_for_generation(
        &self,
        template_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(ScheduleSlot, i64)>, AppError> {
        if template_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; template_ids.len()].join(", ");
        let sql = format!(
            "SELECT s.*,
                    (SELECT COUNT(*) FROM bookings b
                     WHERE b.schedule_slot_id = s.id
                       AND b.status IN ('pending', 'confirmed')) AS active_bookings
             FROM schedule_slots s
             WHERE s.schedule_template_id IN ({}) AND s.start_time >= ? AND s.start_time < ?",
            placeholders
        );

        let mut query = sqlx::query_as::<_, OccupiedSlotRow>(&sql);
        for id in template_ids {
            query = query.bind(id);
        }
        let rows = query
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(rows.into_iter().map(|row| (row.slot, row.active_bookings)).collect())
    }

    async fn apply_generation(
        &self,
        delete_ids: &[String],
        new_slots: &[ScheduleSlot],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for id in delete_ids {
            // The plan only schedules idle slots for replacement; the guard
            // holds if a booking slipped in between planning and applying.
            let result = sqlx::query(
                "DELETE FROM schedule_slots
                 WHERE id = ? AND NOT EXISTS (
                     SELECT 1 FROM bookings b
                     WHERE b.schedule_slot_id = schedule_slots.id
                       AND b.status IN ('pending', 'confirmed'))",
            )
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
            if result.rows_affected() == 0 {
                return Err(AppError::Conflict(
                    "A slot scheduled for replacement received a booking".into(),
                ));
            }
        }

        for slot in new_slots {
            sqlx::query(
                "INSERT INTO schedule_slots (id, schedule_template_id, start_time, end_time,
                    capacity, booked_count, is_available, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&slot.id)
            .bind(&slot.schedule_template_id)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .bind(slot.capacity)
            .bind(slot.booked_count)
            .bind(slot.is_available)
            .bind(slot.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn set_availability(&self, id: &str, is_available: bool) -> Result<ScheduleSlot, AppError> {
        sqlx::query_as::<_, ScheduleSlot>(
            "UPDATE schedule_slots SET is_available = ? WHERE id = ? RETURNING *",
        )
        .bind(is_available)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Schedule slot not found".into()))
    }
}
