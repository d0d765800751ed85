//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::error::AnalyticsError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed metric or selector
    Analytics(AnalyticsError),
    /// Invalid request parameter other than a metric
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Analytics(e) => (
                StatusCode::BAD_REQUEST,
                ApiError::new(e.code(), e.to_string()),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => {
                let details = e.context().to_string();
                let (status, code) = match e {
                    RepositoryError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    RepositoryError::ValidationError { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
                    }
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_ERROR"),
                };
                (status, ApiError::new(code, e.to_string()).with_details(details))
            }
        };

        if status.is_server_error() {
            tracing::error!(code = %error.code, "{}", error.message);
        }

        (status, Json(error)).into_response()
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        AppError::Analytics(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
