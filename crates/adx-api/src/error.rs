//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//!
//! Schema validation failures are returned as `400` with the validator's
//! error list verbatim, so clients see every failing field at once:
//!
//! ```json
//! {"errors": [{"error": "PROPERTY_MISSING", "message": "root -> name is required", "path": "root -> name"}]}
//! ```
//!
//! Other failures use the `{"error": {"code", "message"}}` envelope. Internal
//! error details are logged, never returned.

use adx_schema::{SchemaError, ValidationError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body for schema validation failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub errors: Vec<ValidationError>,
}

/// Body for every other failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request failed schema validation (400).
    #[error("request failed validation with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// Request could not be parsed or mapped onto its type (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            Self::Validation(errors) => {
                return (status, Json(ValidationErrorBody { errors })).into_response();
            }
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// A schema problem at request time means the service is misconfigured.
impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        Self::Internal(err.to_string())
    }
}
