use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named session length (e.g. "Standard Session", 60 minutes) referenced
/// by schedule templates and package definitions. Soft-deleted only.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SessionDuration {
    pub id: String,
    pub name: String,
    pub minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SessionDuration {
    pub fn new(name: String, minutes: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            minutes,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
