//! HTTP error responses.
//!
//! Every failure is rendered as JSON `{ "success": false, "error": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::domain::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

/// Failure of an HTTP request.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed id or request body.
    BadRequest(String),
    /// The store holds no records (list endpoint only).
    NoRecords,
    /// A page file does not exist.
    PageNotFound(String),
    /// Metrics are disabled in config.
    MetricsDisabled,
    /// Store operation failure.
    Store(StoreError),
    /// Anything else that is our fault.
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NoRecords => (StatusCode::NOT_FOUND, "No records available".to_string()),
            Self::PageNotFound(name) => (StatusCode::NOT_FOUND, format!("Page {name} not found")),
            Self::MetricsDisabled => (StatusCode::NOT_FOUND, "Metrics are disabled".to_string()),
            Self::Store(err @ StoreError::NotFound(_)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Store(StoreError::Closed) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service is shutting down".to_string(),
            ),
            Self::Store(StoreError::Io { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save records".to_string(),
            ),
            Self::Store(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            match &self {
                Self::Store(err) => error!(error = %err, "Request failed"),
                Self::Internal(detail) => error!(error = %detail, "Request failed"),
                _ => {}
            }
        }
        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}
