//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use stratforge_types::error::{GenerationError, WizardError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Stage-registry errors.
    Wizard(WizardError),
    /// Generation service / provider errors.
    Generation(GenerationError),
    /// Unknown session id.
    SessionNotFound(String),
    /// Request validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<WizardError> for AppError {
    fn from(e: WizardError) -> Self {
        AppError::Wizard(e)
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::Generation(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Wizard(e @ WizardError::OutOfRange { .. }) => {
                (StatusCode::CONFLICT, "OUT_OF_RANGE", e.to_string())
            }
            AppError::Wizard(e @ WizardError::UnknownStage(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_STAGE", e.to_string())
            }
            AppError::Wizard(e @ WizardError::InvalidStageData { .. }) => {
                (StatusCode::BAD_REQUEST, "INVALID_STAGE_DATA", e.to_string())
            }
            AppError::Generation(e @ GenerationError::MissingSelection(_)) => {
                (StatusCode::BAD_REQUEST, "MISSING_SELECTION", e.to_string())
            }
            AppError::Generation(e @ GenerationError::InFlight) => {
                (StatusCode::CONFLICT, "GENERATION_IN_FLIGHT", e.to_string())
            }
            AppError::Generation(e @ GenerationError::AuthenticationFailed) => (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_AUTH_FAILED",
                e.to_string(),
            ),
            AppError::Generation(e @ GenerationError::RateLimited { .. }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "PROVIDER_RATE_LIMITED",
                e.to_string(),
            ),
            AppError::Generation(e @ GenerationError::Timeout) => {
                (StatusCode::GATEWAY_TIMEOUT, "PROVIDER_TIMEOUT", e.to_string())
            }
            AppError::Generation(e) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", e.to_string())
            }
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("No session with id {id}"),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
