//! Maps domain `AppError` to HTTP responses.
//!
//! Every failure is rendered as `{"success":false,"error":[{"code":..,"msg":..}]}`.
//! The numeric codes are part of the public contract with existing clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use notihub_core::error::{AppError, ErrorKind};

/// Code for unexpected server failures.
pub const CODE_INTERNAL: u32 = 50002000;
/// Code for missing or rejected credentials.
pub const CODE_UNAUTHORIZED: u32 = 50002100;
/// Code for lookups that found nothing.
pub const CODE_NOT_FOUND: u32 = 50002200;
/// Code for invalid parameters, bodies and filters.
pub const CODE_WRONG_REQUEST: u32 = 50002300;
/// Code for a failing storage medium.
pub const CODE_STORAGE_UNAVAILABLE: u32 = 50002400;
/// Code for requests arriving after the store was closed.
pub const CODE_SERVICE_UNAVAILABLE: u32 = 50002500;

/// One entry of the `error` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    /// Machine-readable error code.
    pub code: u32,
    /// Human-readable message.
    pub msg: String,
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Errors describing the failure.
    pub error: Vec<ErrorItem>,
}

/// Handler error type carrying an [`AppError`] to the response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status, envelope code and message for an error kind.
pub fn classify(kind: ErrorKind) -> (StatusCode, u32, &'static str) {
    match kind {
        ErrorKind::BadRequest | ErrorKind::BadFilter => {
            (StatusCode::BAD_REQUEST, CODE_WRONG_REQUEST, "Wrong request")
        }
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, CODE_UNAUTHORIZED, "Unauthorized"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, CODE_NOT_FOUND, "Not found"),
        ErrorKind::Persistence => (
            StatusCode::SERVICE_UNAVAILABLE,
            CODE_STORAGE_UNAVAILABLE,
            "Storage unavailable",
        ),
        ErrorKind::Closed => (
            StatusCode::SERVICE_UNAVAILABLE,
            CODE_SERVICE_UNAVAILABLE,
            "Service unavailable",
        ),
        ErrorKind::Configuration | ErrorKind::Serialization | ErrorKind::Internal => (
            StatusCode::INTERNAL_SERVER_ERROR,
            CODE_INTERNAL,
            "Internal error",
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code, msg) = classify(err.kind);

        if err.kind.is_client_error() {
            debug!(kind = %err.kind, error = %err.message, "Request rejected");
        } else if err.kind.is_retryable() {
            warn!(kind = %err.kind, error = %err.message, "Storage unavailable");
        } else {
            error!(kind = %err.kind, error = %err.message, "Request failed");
        }

        let body = ApiErrorResponse {
            success: false,
            error: vec![ErrorItem {
                code,
                msg: msg.to_string(),
            }],
        };

        (status, Json(body)).into_response()
    }
}
