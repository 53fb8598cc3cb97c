//! HTTP boundary error translation.
//!
//! Every public operation's internal errors are translated here before
//! crossing the system boundary; no raw infrastructure error reaches a
//! response body. Not-found and not-owned are deliberately the same 404.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::error;

use brainvault_core::Error;

#[derive(Debug)]
pub enum ApiError {
    /// Infrastructure failure: logged with detail, generic body (500).
    Internal(Error),
    /// Missing/invalid credentials (401).
    Unauthorized(String),
    /// Absent or not owned by the caller; indistinguishable (404).
    NotFound,
    /// Validation failure, names the offending field (400).
    BadRequest(String),
    /// External capability call failed (502).
    UpstreamFailed(String),
    /// Required capability is not configured (503).
    ServiceUnavailable(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) | Error::IdeaNotFound(_) | Error::UserNotFound(_) => {
                ApiError::NotFound
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            Error::Transcription(msg) => ApiError::UpstreamFailed(msg),
            Error::Config(msg) => ApiError::ServiceUnavailable(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(
                    subsystem = "api",
                    error = %err,
                    "Unhandled internal error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UpstreamFailed(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
