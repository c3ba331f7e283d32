use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),
    #[error("Slot full: {0}")]
    SlotFull(String),
    #[error("Insufficient sessions: {0}")]
    InsufficientSessions(String),
    #[error("Invalid group size: {0}")]
    InvalidGroupSize(String),
    #[error("Invalid status transition: {0} -> {1}")]
    InvalidTransition(String, String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Stable machine-readable kind, part of the wire contract.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::SlotUnavailable(_) => "slot_unavailable",
            AppError::SlotFull(_) => "slot_full",
            AppError::InsufficientSessions(_) => "insufficient_sessions",
            AppError::InvalidGroupSize(_) => "invalid_group_size",
            AppError::InvalidTransition(_, _) => "invalid_transition",
            AppError::Conflict(_) => "conflict",
            AppError::Internal => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 / 1555 = SQLite unique constraint violations
                    if code == "2067" || code == "1555" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({
                                "success": false,
                                "error": "conflict",
                                "message": "Resource already exists (duplicate entry)"
                            })),
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::SlotUnavailable(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::SlotFull(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InsufficientSessions(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InvalidGroupSize(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidTransition(from, to) => (
                StatusCode::CONFLICT,
                format!("Illegal status transition: {} -> {}", from, to),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };

        let body = Json(json!({
            "success": false,
            "error": self.kind(),
            "message": message
        }));

        (status, body).into_response()
    }
}
