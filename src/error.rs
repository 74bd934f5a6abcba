//! # API Errors
//!
//! The error taxonomy every handler maps into. Each variant carries the
//! user-facing message; internal detail (driver errors, SQL) is logged at
//! the call site and never serialized into a response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Result type for request handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Request-level errors, mapped to HTTP status codes
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Missing or malformed input, detected before any database interaction
    #[error("{0}")]
    Validation(String),

    /// Bad credentials
    #[error("{0}")]
    Auth(String),

    /// Entity absent
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation on a simple insert (batch saves overwrite instead)
    #[error("{0}")]
    Duplicate(String),

    /// Connection-acquisition failure; the pool is saturated or the
    /// database is unreachable
    #[error("Service temporarily unavailable. Please try again.")]
    Unavailable,

    /// Any other database failure, including an aborted batch
    #[error("An internal server error occurred.")]
    Persistence,
}

impl ApiError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Duplicate(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "message": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}
