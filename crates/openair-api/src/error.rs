//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`
//! and let domain errors convert through `From` impls so they render
//! consistently (status, body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use openair_core::{AppError, ErrorMetadata, LogLevel};
use openair_services::PrerecordingsError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from openair-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<PrerecordingsError> for HttpAppError {
    fn from(err: PrerecordingsError) -> Self {
        let app = match &err {
            PrerecordingsError::EventNotFound(_)
            | PrerecordingsError::InstanceNotFound { .. }
            | PrerecordingsError::PrerecordingNotFound { .. } => AppError::NotFound(err.to_string()),
            PrerecordingsError::BadEventType(_) => AppError::BadRequest(err.to_string()),
            PrerecordingsError::Shows(_) => AppError::Shows(err.to_string()),
            PrerecordingsError::Storage(_) => AppError::Storage(err.to_string()),
            PrerecordingsError::InvalidTimezone { .. } | PrerecordingsError::MalformedKey(_) => {
                AppError::Internal(err.to_string())
            }
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
        });

        (status, body).into_response()
    }
}
