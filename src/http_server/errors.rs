//! Gateway request errors
//!
//! Every variant is terminal for its request and never process-fatal.
//! Validation failures are reported before any query is built or executed;
//! warehouse failures surface as a stable generic message, with the full
//! detail kept in server-side logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::warehouse::WarehouseError;

/// Result type for request handling
pub type ApiResult<T> = Result<T, ApiError>;

/// Request failure taxonomy
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// A required input is absent from query string, body, and path
    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    /// An input is present but does not parse as the required type
    #[error("invalid {0}")]
    InvalidParam(String),

    /// No handler matches the request path
    #[error("invalid path")]
    UnknownRoute,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Query execution failed; detail stays out of the response body
    #[error("query execution failed")]
    Warehouse(#[from] WarehouseError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidParam(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownRoute => StatusCode::BAD_REQUEST,
            ApiError::Warehouse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
