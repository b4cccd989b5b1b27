//! Error types for circl-server
//!
//! Maps the common error taxonomy onto HTTP status codes:
//! not found → 404, validation → 400, everything else → 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Resource not found (404), answered with a default body
    #[error("{message}")]
    NotFoundWithFallback {
        message: String,
        fallback: Map<String, Value>,
    },

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl From<circl_common::Error> for ApiError {
    fn from(err: circl_common::Error) -> Self {
        use circl_common::Error;

        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::UnparsableIdentifier(_) => ApiError::BadRequest(err.to_string()),
            Error::Storage(msg) => ApiError::Internal(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::NotFoundWithFallback {
                message,
                mut fallback,
            } => {
                fallback.insert("error".to_string(), Value::String(message));
                (StatusCode::NOT_FOUND, Value::Object(fallback))
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Internal(message) => {
                tracing::error!("Request failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_errors_map_to_status_codes() {
        let cases = [
            (circl_common::Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (circl_common::Error::Validation("x".into()), StatusCode::BAD_REQUEST),
            (circl_common::Error::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                circl_common::Error::Io(std::io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_storage_message_is_the_cause() {
        let err = ApiError::from(circl_common::Error::Storage("EOF while parsing".into()));
        assert_eq!(err.to_string(), "EOF while parsing");
    }
}
