use crate::api::dtos::requests::{CreateDurationRequest, UpdateDurationRequest};
use crate::api::dtos::responses::ApiResponse;
use crate::domain::models::duration::SessionDuration;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

pub async fn create_duration(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDurationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.minutes < 1 {
        return Err(AppError::Validation("Minutes must be at least 1".into()));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }

    let duration = SessionDuration::new(payload.name, payload.minutes);
    let created = state.duration_repo.create(&duration).await?;
    info!("Session duration created: {} ({} min)", created.id, created.minutes);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list_durations(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let durations = state.duration_repo.list().await?;
    Ok(Json(ApiResponse::ok(durations)))
}

pub async fn update_duration(
    State(state): State<Arc<AppState>>,
    Path(duration_id): Path<String>,
    Json(payload): Json<UpdateDurationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut duration = state
        .duration_repo
        .find_by_id(&duration_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session duration not found".into()))?;

    if let Some(name) = payload.name {
        duration.name = name;
    }
    if let Some(minutes) = payload.minutes {
        if minutes < 1 {
            return Err(AppError::Validation("Minutes must be at least 1".into()));
        }
        duration.minutes = minutes;
    }
    if let Some(is_active) = payload.is_active {
        duration.is_active = is_active;
    }

    let updated = state.duration_repo.update(&duration).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn delete_duration(
    State(state): State<Arc<AppState>>,
    Path(duration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.duration_repo.deactivate(&duration_id).await?;
    info!("Session duration deactivated: {}", duration_id);
    Ok(Json(ApiResponse::with_message(serde_json::json!({}), "Session duration deactivated")))
}
