use crate::api::dtos::requests::{BookingQuery, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::api::dtos::responses::{ApiResponse, Paginated};
use crate::domain::ports::BookingFilter;
use crate::domain::services::booking_ledger::CreateBookingParams;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_ledger
        .create_booking(CreateBookingParams {
            client_id: payload.client_id,
            schedule_slot_id: payload.schedule_slot_id,
            user_package_id: payload.user_package_id,
            booking_type: payload.booking_type,
            group_size: payload.group_size,
            payment_method: payload.payment_method,
            notes: payload.notes,
            discount_amount: payload.discount_amount,
            currency_code: payload.currency_code,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = BookingFilter {
        client_id: query.client_id,
        schedule_slot_id: query.schedule_slot_id,
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
        page: query.page.max(1),
        limit: query.limit.clamp(1, 100),
    };

    let bookings = state.booking_repo.list(&filter).await?;
    let total = state.booking_repo.count(&filter).await?;
    Ok(Json(Paginated::new(bookings, filter.page, filter.limit, total)))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(&booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;
    Ok(Json(ApiResponse::ok(booking)))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_ledger
        .update_status(&booking_id, payload.status, payload.reason)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.booking_ledger.delete_booking(&booking_id).await?;
    Ok(Json(ApiResponse::with_message(serde_json::json!({}), "Booking deleted")))
}
