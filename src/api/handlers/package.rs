use crate::api::dtos::requests::{
    CreatePackageRequest, PriceQuery, UpdatePackageRequest, UpsertPriceRequest,
};
use crate::api::dtos::responses::ApiResponse;
use crate::domain::models::package::{NewPackageParams, PackageDefinition, PackagePrice};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

pub async fn create_package(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePackageRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    state
        .duration_repo
        .find_by_id(&payload.session_duration_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session duration not found".into()))?;

    let definition = PackageDefinition::new(NewPackageParams {
        name: payload.name,
        description: payload.description,
        sessions_count: payload.sessions_count,
        session_duration_id: payload.session_duration_id,
        package_type: payload.package_type,
        max_group_size: payload.max_group_size,
    });
    definition.validate()?;

    let created = state.package_repo.create_definition(&definition).await?;
    info!("Package definition created: {} ({})", created.id, created.name);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list_packages(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let definitions = state.package_repo.list_definitions().await?;
    Ok(Json(ApiResponse::ok(definitions)))
}

pub async fn get_package(
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let definition = state
        .package_repo
        .find_definition(&package_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Package definition not found".into()))?;
    Ok(Json(ApiResponse::ok(definition)))
}

pub async fn update_package(
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
    Json(payload): Json<UpdatePackageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut definition = state
        .package_repo
        .find_definition(&package_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Package definition not found".into()))?;

    if let Some(name) = payload.name {
        definition.name = name;
    }
    if let Some(description) = payload.description {
        definition.description = Some(description);
    }
    if let Some(count) = payload.sessions_count {
        definition.sessions_count = count;
    }
    if let Some(duration_id) = payload.session_duration_id {
        state
            .duration_repo
            .find_by_id(&duration_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Session duration not found".into()))?;
        definition.session_duration_id = duration_id;
    }
    if let Some(package_type) = payload.package_type {
        definition.package_type = package_type;
    }
    if payload.max_group_size.is_some() {
        definition.max_group_size = payload.max_group_size;
    }
    if let Some(is_active) = payload.is_active {
        definition.is_active = is_active;
    }
    definition.validate()?;

    // Already purchased packages keep the pool sizes they were sold with.
    let updated = state.package_repo.update_definition(&definition).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn upsert_price(
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
    Json(payload): Json<UpsertPriceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.price < 0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }
    state
        .package_repo
        .find_definition(&package_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Package definition not found".into()))?;
    state
        .currency_repo
        .find_by_code(&payload.currency_code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown currency: {}", payload.currency_code)))?;

    let price = PackagePrice::new(
        package_id,
        payload.currency_code,
        payload.price,
        payload.pricing_mode,
    );
    let stored = state.package_repo.upsert_price(&price).await?;
    info!(
        "Package price set: {} {} {:?}",
        stored.package_definition_id, stored.currency_code, stored.pricing_mode
    );
    Ok(Json(ApiResponse::ok(stored)))
}

pub async fn list_prices(
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .package_repo
        .find_definition(&package_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Package definition not found".into()))?;
    let prices = state.package_repo.list_prices(&package_id).await?;
    Ok(Json(ApiResponse::ok(prices)))
}

pub async fn resolve_price(
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
    Query(query): Query<PriceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let quote = state.pricing.resolve(&package_id, query.currency.as_deref()).await?;
    Ok(Json(ApiResponse::ok(quote)))
}
