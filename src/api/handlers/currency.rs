use crate::api::dtos::requests::CreateCurrencyRequest;
use crate::api::dtos::responses::ApiResponse;
use crate::domain::models::currency::Currency;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

pub async fn create_currency(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCurrencyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let code = payload.code.trim().to_ascii_uppercase();
    if code.len() != 3 {
        return Err(AppError::Validation("Currency code must be three letters".into()));
    }
    if payload.exchange_rate <= 0.0 {
        return Err(AppError::Validation("Exchange rate must be positive".into()));
    }
    if state.currency_repo.find_by_code(&code).await?.is_some() {
        return Err(AppError::Conflict(format!("Currency {} already exists", code)));
    }

    let currency = Currency::new(code, payload.name, payload.symbol, payload.exchange_rate);
    let created = state.currency_repo.create(&currency).await?;
    info!("Currency created: {} (rate {})", created.code, created.exchange_rate);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list_currencies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let currencies = state.currency_repo.list().await?;
    Ok(Json(ApiResponse::ok(currencies)))
}
