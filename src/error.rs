//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::store::StoreError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Storage errors (404 / 409 / 400 / 500 depending on kind)
    #[error(transparent)]
    Store(#[from] StoreError),

    // Server errors (5xx)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // Domain errors are all caused by the request
            AppError::Domain(domain_err) => {
                (StatusCode::BAD_REQUEST, domain_err.code(), None)
            }

            AppError::Store(store_err) => match store_err {
                StoreError::NotFound(id) => {
                    (StatusCode::NOT_FOUND, "subscription_not_found", Some(id.to_string()))
                }
                StoreError::Conflict(id) => {
                    (StatusCode::CONFLICT, "subscription_exists", Some(id.to_string()))
                }
                StoreError::ConstraintViolation(msg) => {
                    (StatusCode::BAD_REQUEST, "constraint_violation", Some(msg.clone()))
                }
                StoreError::Database(e) => {
                    tracing::error!("Database error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
                }
            },

            // 500 Internal Server Error
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        // Server-side failures keep their cause out of the response body
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
