use crate::api::dtos::requests::CreateClientRequest;
use crate::api::dtos::responses::ApiResponse;
use crate::domain::models::client::Client;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.full_name.trim().is_empty() {
        return Err(AppError::Validation("Full name is required".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }

    let client = Client::new(payload.full_name, payload.email, payload.phone);
    let created = state.client_registry.create(&client).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let clients = state.client_registry.list().await?;
    Ok(Json(ApiResponse::ok(clients)))
}

pub async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let client = state
        .client_registry
        .lookup(&client_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".into()))?;
    Ok(Json(ApiResponse::ok(client)))
}
