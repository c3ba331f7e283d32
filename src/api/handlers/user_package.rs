use crate::api::dtos::requests::{PurchasePackageRequest, UserPackageQuery};
use crate::api::dtos::responses::ApiResponse;
use crate::domain::models::user_package::UserPackage;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn purchase_package(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PurchasePackageRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .client_registry
        .lookup(&payload.client_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".into()))?;

    let definition = state
        .package_repo
        .find_definition(&payload.package_definition_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Package definition not found".into()))?;
    if !definition.is_active {
        return Err(AppError::Validation("The package is no longer offered".into()));
    }
    if let Some(expires_at) = payload.expires_at {
        if expires_at <= Utc::now() {
            return Err(AppError::Validation("Expiry must be in the future".into()));
        }
    }

    let purchase = UserPackage::purchase(payload.client_id, &definition, payload.expires_at);
    let created = state.user_package_repo.create(&purchase).await?;
    info!(
        user_package_id = %created.id,
        client_id = %created.client_id,
        "package purchased"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list_user_packages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserPackageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let packages = state.user_package_repo.list_by_client(&query.client_id).await?;
    Ok(Json(ApiResponse::ok(packages)))
}

pub async fn get_user_package(
    State(state): State<Arc<AppState>>,
    Path(user_package_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let package = state
        .user_package_repo
        .find_by_id(&user_package_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User package not found".into()))?;
    Ok(Json(ApiResponse::ok(package)))
}
