use crate::error::AppError;
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Recurring weekly availability pattern. Templates are the admin-owned
/// blueprint; generated slots copy their values and live independently.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ScheduleTemplate {
    pub id: String,
    /// Lowercase weekday name: "monday" .. "sunday".
    pub day_of_week: String,
    /// Time of day, "HH:MM".
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
    pub session_duration_id: String,
    pub is_available: bool,
    /// Whether slots materialized from this template open as bookable.
    pub auto_available: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewTemplateParams {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
    pub session_duration_id: String,
    pub is_available: bool,
    pub auto_available: bool,
}

impl ScheduleTemplate {
    pub fn new(params: NewTemplateParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day_of_week: params.day_of_week,
            start_time: params.start_time,
            end_time: params.end_time,
            capacity: params.capacity,
            session_duration_id: params.session_duration_id,
            is_available: params.is_available,
            auto_available: params.auto_available,
            created_at: Utc::now(),
        }
    }

    pub fn weekday(&self) -> Result<Weekday, AppError> {
        parse_day_of_week(&self.day_of_week)
    }

    pub fn start(&self) -> Result<NaiveTime, AppError> {
        parse_time_of_day(&self.start_time)
    }

    pub fn end(&self) -> Result<NaiveTime, AppError> {
        parse_time_of_day(&self.end_time)
    }

    /// Field-level validation, run before any template write.
    pub fn validate(&self) -> Result<(), AppError> {
        parse_day_of_week(&self.day_of_week)?;
        let start = parse_time_of_day(&self.start_time)?;
        let end = parse_time_of_day(&self.end_time)?;
        if start >= end {
            return Err(AppError::Validation("End time must be after start time".into()));
        }
        if self.capacity < 1 {
            return Err(AppError::Validation("Capacity must be at least 1".into()));
        }
        Ok(())
    }
}

pub fn parse_day_of_week(raw: &str) -> Result<Weekday, AppError> {
    raw.to_ascii_lowercase()
        .parse::<Weekday>()
        .map_err(|_| AppError::Validation(format!("Invalid day of week: {}", raw)))
}

pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time (expected HH:MM): {}", raw)))
}
