//! API error handling
//!
//! Every failure leaves the API as `{"error": message, "code": kind}` with the
//! matching status code.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
}

impl ApiError {
    const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg,
            Self::RateLimited => "Rate limit exceeded".to_string(),
            Self::Internal(msg) => {
                error!(error = %msg, "Internal error while handling request");
                "An internal error occurred".to_string()
            },
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::ExternalService(msg)
            | ApplicationError::Configuration(msg)
            | ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::DomainError;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::RateLimited.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn application_errors_map_to_api_errors() {
        let err: ApiError = ApplicationError::Domain(DomainError::NoReadings).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = ApplicationError::NotFound("Atlantis".into()).into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Atlantis"));

        let err: ApiError = ApplicationError::ExternalService("HTTP 502".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn error_response_omits_nothing() {
        let body = serde_json::to_value(ErrorResponse {
            error: "city is required".into(),
            code: "bad_request".into(),
        })
        .unwrap();
        assert_eq!(body["error"], "city is required");
        assert_eq!(body["code"], "bad_request");
    }
}
