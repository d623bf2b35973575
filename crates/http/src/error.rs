//! Error handling for the Folio HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::{NoContext, Timestamp, Uuid};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Errors raised by the HTTP layer itself, outside any resource module.
///
/// Every variant renders as `{"error": message}`.
#[derive(Error, Debug)]
pub enum AppError {
    /// The first path segment names no registered resource.
    #[error("Resource not found")]
    ResourceNotFound,

    /// The request outlived `server.request_timeout_ms`.
    #[error("Request timed out")]
    Timeout,

    /// The request body exceeded the transport limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Storage could not be initialized; carries the underlying error text.
    #[error("{0}")]
    Unavailable(String),

    /// Any fault a module did not handle. The detail is logged, never returned.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create an unavailable error from the bootstrap failure
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ResourceNotFound => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unavailable(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v7(Timestamp::now(NoContext));
        let status = self.status();

        let message = match &self {
            AppError::Internal(err) => {
                tracing::error!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    error = %format!("{err:#}"),
                    "unhandled request error"
                );
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Unavailable(reason) => {
                tracing::error!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    reason = %reason,
                    "request refused, storage unavailable"
                );
                reason.clone()
            }
            AppError::ResourceNotFound => {
                tracing::debug!(status_code = %status.as_u16(), "unknown resource");
                self.to_string()
            }
            AppError::Timeout | AppError::PayloadTooLarge => {
                tracing::warn!(status_code = %status.as_u16(), "request rejected by transport");
                self.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
