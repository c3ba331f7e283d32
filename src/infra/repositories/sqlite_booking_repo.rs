use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::models::slot::ScheduleSlot;
use crate::domain::models::user_package::SessionPool;
use crate::domain::ports::{BookingFilter, BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Pool-specific column names; the two balances live on the same row.
fn pool_columns(pool: SessionPool) -> (&'static str, &'static str) {
    match pool {
        SessionPool::Individual => ("sessions_remaining", "sessions_used"),
        SessionPool::Group => ("group_sessions_remaining", "group_sessions_used"),
    }
}

/// Gives seats back to the slot and sessions back to the package. Release
/// is capped by the used counter so a repeat can never overflow the pool.
async fn release_in_tx(tx: &mut Transaction<'_, Sqlite>, booking: &Booking) -> Result<(), AppError> {
    sqlx::query("UPDATE schedule_slots SET booked_count = MAX(booked_count - ?, 0) WHERE id = ?")
        .bind(booking.occupied_seats())
        .bind(&booking.schedule_slot_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;

    let (remaining_col, used_col) = pool_columns(booking.session_pool());
    let sql = format!(
        "UPDATE user_packages SET {rem} = {rem} + MIN(?, {used}), {used} = {used} - MIN(?, {used}) WHERE id = ?",
        rem = remaining_col,
        used = used_col
    );
    sqlx::query(&sql)
        .bind(booking.reserved_sessions())
        .bind(booking.reserved_sessions())
        .bind(&booking.user_package_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;

    Ok(())
}

fn filter_clauses(filter: &BookingFilter, sql: &mut String) {
    if filter.client_id.is_some() {
        sql.push_str(" AND b.client_id = ?");
    }
    if filter.schedule_slot_id.is_some() {
        sql.push_str(" AND b.schedule_slot_id = ?");
    }
    if filter.status.is_some() {
        sql.push_str(" AND b.status = ?");
    }
    if filter.date_from.is_some() {
        sql.push_str(" AND s.start_time >= ?");
    }
    if filter.date_to.is_some() {
        sql.push_str(" AND s.start_time <= ?");
    }
}

fn bind_filter<'q, O>(
    mut query: sqlx::query::QueryAs<'q, Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    filter: &'q BookingFilter,
) -> sqlx::query::QueryAs<'q, Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
    if let Some(client_id) = &filter.client_id {
        query = query.bind(client_id);
    }
    if let Some(slot_id) = &filter.schedule_slot_id {
        query = query.bind(slot_id);
    }
    if let Some(status) = filter.status {
        query = query.bind(status);
    }
    if let Some(from) = filter.date_from {
        query = query.bind(from);
    }
    if let Some(to) = filter.date_to {
        query = query.bind(to);
    }
    query
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_reserved(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let slot = sqlx::query_as::<_, ScheduleSlot>("SELECT * FROM schedule_slots WHERE id = ?")
            .bind(&booking.schedule_slot_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Schedule slot not found".into()))?;

        if !slot.is_available {
            return Err(AppError::SlotUnavailable("The schedule slot is not open for booking".into()));
        }

        // Guarded increment: the WHERE clause is the capacity check, so two
        // writers racing for the last seat cannot both pass.
        let seats = booking.occupied_seats();
        let result = sqlx::query(
            "UPDATE schedule_slots SET booked_count = booked_count + ?
             WHERE id = ? AND is_available = 1 AND booked_count + ? <= capacity",
        )
        .bind(seats)
        .bind(&booking.schedule_slot_id)
        .bind(seats)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::SlotFull(format!(
                "The slot has {} of {} seats taken",
                slot.booked_count, slot.capacity
            )));
        }

        let (remaining_col, used_col) = pool_columns(booking.session_pool());
        let sql = format!(
            "UPDATE user_packages SET {rem} = {rem} - ?, {used} = {used} + ?
             WHERE id = ? AND is_active = 1 AND {rem} >= ?",
            rem = remaining_col,
            used = used_col
        );
        let amount = booking.reserved_sessions();
        let result = sqlx::query(&sql)
            .bind(amount)
            .bind(amount)
            .bind(&booking.user_package_id)
            .bind(amount)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            // Rolls back the slot increment with the transaction.
            return Err(AppError::InsufficientSessions(
                "No sessions remaining in the package".into(),
            ));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, client_id, schedule_slot_id, user_package_id, booking_type,
                group_size, status, payment_method, notes, total_amount, discount_amount,
                final_amount, currency_code, cancelled_at, cancelled_reason, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&booking.id)
        .bind(&booking.client_id)
        .bind(&booking.schedule_slot_id)
        .bind(&booking.user_package_id)
        .bind(booking.booking_type)
        .bind(booking.group_size)
        .bind(booking.status)
        .bind(&booking.payment_method)
        .bind(&booking.notes)
        .bind(booking.total_amount)
        .bind(booking.discount_amount)
        .bind(booking.final_amount)
        .bind(&booking.currency_code)
        .bind(booking.cancelled_at)
        .bind(&booking.cancelled_reason)
        .bind(booking.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        let mut sql = String::from(
            "SELECT b.* FROM bookings b
             JOIN schedule_slots s ON s.id = b.schedule_slot_id
             WHERE 1 = 1",
        );
        filter_clauses(filter, &mut sql);
        sql.push_str(" ORDER BY s.start_time ASC LIMIT ? OFFSET ?");

        let query = bind_filter(sqlx::query_as::<_, Booking>(&sql), filter)
            .bind(filter.limit)
            .bind((filter.page - 1) * filter.limit);
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count(&self, filter: &BookingFilter) -> Result<i64, AppError> {
        let mut sql = String::from(
            "SELECT COUNT(*) as count FROM bookings b
             JOIN schedule_slots s ON s.id = b.schedule_slot_id
             WHERE 1 = 1",
        );
        filter_clauses(filter, &mut sql);

        let row = bind_filter(sqlx::query_as::<_, (i64,)>(&sql), filter)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.0)
    }

    async fn transition(
        &self,
        booking: &Booking,
        from: BookingStatus,
        release: bool,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Guarded on the status the caller validated against. A concurrent
        // transition that committed first leaves nothing to match, so a
        // second cancel cannot release the seats and sessions again.
        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ?, cancelled_at = ?, cancelled_reason = ?
             WHERE id = ? AND status = ?
             RETURNING *",
        )
        .bind(booking.status)
        .bind(booking.cancelled_at)
        .bind(&booking.cancelled_reason)
        .bind(&booking.id)
        .bind(from)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let updated = match updated {
            Some(updated) => updated,
            None => {
                let exists = sqlx::query_as::<_, (BookingStatus,)>(
                    "SELECT status FROM bookings WHERE id = ?",
                )
                .bind(&booking.id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?;
                return Err(match exists {
                    None => AppError::NotFound("Booking not found".into()),
                    Some(_) => AppError::Conflict(
                        "The booking status changed concurrently".into(),
                    ),
                });
            }
        };

        if release {
            release_in_tx(&mut tx, booking).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, booking: &Booking) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // The deleted row's own status decides whether anything is given
        // back, so a cancel that committed in between does not lead to a
        // second release.
        let deleted = sqlx::query_as::<_, (BookingStatus,)>(
            "DELETE FROM bookings WHERE id = ? RETURNING status",
        )
        .bind(&booking.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if deleted.0.is_active() {
            release_in_tx(&mut tx, booking).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
