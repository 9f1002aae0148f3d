use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::forecast::ForecastError;

/// API error types that can be returned from handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Province not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Error body; `error` is the only field clients rely on.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client
    fn public_message(&self) -> String {
        match self {
            ApiError::InvalidInput(_) => "Invalid input data.".to_string(),
            ApiError::NotFound(_) => "Data not found for the selected province.".to_string(),
            ApiError::Unprocessable(detail) => detail.clone(),
            ApiError::Timeout => "Request timed out.".to_string(),
            ApiError::ServiceUnavailable(_) => "Province dataset is not available.".to_string(),
            ApiError::InternalError(_) => "An internal error occurred.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InternalError(_) => tracing::error!(error = %self, "API error occurred"),
            ApiError::Timeout | ApiError::ServiceUnavailable(_) => tracing::warn!(error = %self, "Service unavailable"),
            _ => tracing::debug!(error = %self, "Client error"),
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<ForecastError> for ApiError {
    fn from(error: ForecastError) -> Self {
        match error {
            ForecastError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            ForecastError::NotFound(province) => ApiError::NotFound(province),
            e @ (ForecastError::InsufficientData { .. } | ForecastError::NumericDegenerate(_)) => {
                ApiError::Unprocessable(e.to_string())
            }
            e @ (ForecastError::DimensionMismatch { .. }
            | ForecastError::Data(_)
            | ForecastError::Chart(_)) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::InvalidInput(errors.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(error: tokio::task::JoinError) -> Self {
        ApiError::InternalError(format!("forecast task failed: {}", error))
    }
}
