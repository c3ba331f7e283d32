use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A concrete, dated, bookable instance materialized from a template.
/// Capacity is copied from the template at generation time; afterwards the
/// slot is mutated only by the booking ledger, never by template edits.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ScheduleSlot {
    pub id: String,
    pub schedule_template_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: i32,
    pub booked_count: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl ScheduleSlot {
    pub fn new(
        schedule_template_id: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        capacity: i32,
        is_available: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            schedule_template_id,
            start_time,
            end_time,
            capacity,
            booked_count: 0,
            is_available,
            created_at: Utc::now(),
        }
    }

    pub fn remaining_capacity(&self) -> i32 {
        self.capacity - self.booked_count
    }
}
