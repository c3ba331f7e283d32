use crate::api::dtos::requests::{GenerateSlotsRequest, SetSlotAvailabilityRequest, SlotQuery};
use crate::api::dtos::responses::{ApiResponse, Paginated};
use crate::domain::ports::SlotFilter;
use crate::domain::services::slot_generator::GenerateSlotsParams;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn list_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = SlotFilter {
        schedule_template_id: query.schedule_template_id,
        date_from: query.date_from,
        date_to: query.date_to,
        is_available: query.is_available,
        page: query.page.max(1),
        limit: query.limit.clamp(1, 100),
    };

    let slots = state.slot_repo.list(&filter).await?;
    let total = state.slot_repo.count(&filter).await?;
    Ok(Json(Paginated::new(slots, filter.page, filter.limit, total)))
}

pub async fn get_slot(
    State(state): State<Arc<AppState>>,
    Path(slot_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let slot = state
        .slot_repo
        .find_by_id(&slot_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule slot not found".into()))?;
    Ok(Json(ApiResponse::ok(slot)))
}

pub async fn generate_slots(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateSlotsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = state
        .slot_generator
        .generate(GenerateSlotsParams {
            template_ids: payload.template_ids,
            start_date: payload.start_date,
            end_date: payload.end_date,
            overwrite_existing: payload.overwrite_existing,
        })
        .await?;

    let message = format!("Generated {} slots", report.slots_generated);
    Ok(Json(ApiResponse::with_message(report, message)))
}

pub async fn set_slot_availability(
    State(state): State<Arc<AppState>>,
    Path(slot_id): Path<String>,
    Json(payload): Json<SetSlotAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Closing a slot blocks new bookings; existing bookings stand.
    let slot = state.slot_repo.set_availability(&slot_id, payload.is_available).await?;
    Ok(Json(ApiResponse::ok(slot)))
}
