use crate::api::handlers::{
    booking, client, currency, duration, health, package, schedule, slot, user_package,
};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Session durations
        .route("/api/v1/session-durations", post(duration::create_duration).get(duration::list_durations))
        .route("/api/v1/session-durations/{duration_id}", put(duration::update_duration).delete(duration::delete_duration))

        // Schedule templates
        .route("/api/v1/schedule-templates", post(schedule::create_template).get(schedule::list_templates))
        .route("/api/v1/schedule-templates/{template_id}", get(schedule::get_template).put(schedule::update_template).delete(schedule::delete_template))

        // Schedule slots
        .route("/api/v1/schedule-slots", get(slot::list_slots))
        .route("/api/v1/schedule-slots/generate", post(slot::generate_slots))
        .route("/api/v1/schedule-slots/{slot_id}", get(slot::get_slot))
        .route("/api/v1/schedule-slots/{slot_id}/availability", put(slot::set_slot_availability))

        // Package catalog & pricing
        .route("/api/v1/package-definitions", post(package::create_package).get(package::list_packages))
        .route("/api/v1/package-definitions/{package_id}", get(package::get_package).put(package::update_package))
        .route("/api/v1/package-definitions/{package_id}/prices", post(package::upsert_price).get(package::list_prices))
        .route("/api/v1/package-definitions/{package_id}/price", get(package::resolve_price))

        // Purchased packages
        .route("/api/v1/user-packages", post(user_package::purchase_package).get(user_package::list_user_packages))
        .route("/api/v1/user-packages/{user_package_id}", get(user_package::get_user_package))

        // Bookings
        .route("/api/v1/bookings", post(booking::create_booking).get(booking::list_bookings))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking).delete(booking::delete_booking))
        .route("/api/v1/bookings/{booking_id}/status", put(booking::update_booking_status))

        // Clients & currencies
        .route("/api/v1/clients", post(client::create_client).get(client::list_clients))
        .route("/api/v1/clients/{client_id}", get(client::get_client))
        .route("/api/v1/currencies", post(currency::create_currency).get(currency::list_currencies))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                }),
        )
        .with_state(state)
}
