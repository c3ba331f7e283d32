use crate::api::dtos::requests::{CreateTemplateRequest, UpdateTemplateRequest};
use crate::api::dtos::responses::ApiResponse;
use crate::domain::models::schedule::{NewTemplateParams, ScheduleTemplate};
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

async fn require_active_duration(state: &AppState, duration_id: &str) -> Result<(), AppError> {
    let duration = state
        .duration_repo
        .find_by_id(duration_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session duration not found".into()))?;
    if !duration.is_active {
        return Err(AppError::Validation("Session duration is inactive".into()));
    }
    Ok(())
}

pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let template = ScheduleTemplate::new(NewTemplateParams {
        day_of_week: payload.day_of_week.to_ascii_lowercase(),
        start_time: payload.start_time,
        end_time: payload.end_time,
        capacity: payload.capacity,
        session_duration_id: payload.session_duration_id,
        is_available: payload.is_available,
        auto_available: payload.auto_available,
    });
    template.validate()?;
    require_active_duration(&state, &template.session_duration_id).await?;

    let created = state.template_repo.create(&template).await?;
    info!(
        "Schedule template created: {} ({} {}-{})",
        created.id, created.day_of_week, created.start_time, created.end_time
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let templates = state.template_repo.list().await?;
    Ok(Json(ApiResponse::ok(templates)))
}

pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let template = state
        .template_repo
        .find_by_id(&template_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule template not found".into()))?;
    Ok(Json(ApiResponse::ok(template)))
}

pub async fn update_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<String>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut template = state
        .template_repo
        .find_by_id(&template_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule template not found".into()))?;

    if let Some(day) = payload.day_of_week {
        template.day_of_week = day.to_ascii_lowercase();
    }
    if let Some(start) = payload.start_time {
        template.start_time = start;
    }
    if let Some(end) = payload.end_time {
        template.end_time = end;
    }
    if let Some(capacity) = payload.capacity {
        template.capacity = capacity;
    }
    if let Some(duration_id) = payload.session_duration_id {
        require_active_duration(&state, &duration_id).await?;
        template.session_duration_id = duration_id;
    }
    if let Some(is_available) = payload.is_available {
        template.is_available = is_available;
    }
    if let Some(auto_available) = payload.auto_available {
        template.auto_available = auto_available;
    }
    template.validate()?;

    // Edits apply to the pattern only; slots already generated keep their
    // copied values.
    let updated = state.template_repo.update(&template).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.template_repo.delete(&template_id).await?;
    info!("Schedule template deleted: {}", template_id);
    Ok(Json(ApiResponse::with_message(
        serde_json::json!({}),
        "Template and its unbooked slots deleted",
    )))
}
