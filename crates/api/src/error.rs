//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use storage::StoreError;

use crate::mailer::MailError;

/// API-level error type that maps to HTTP responses.
///
/// Every variant renders as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or incomplete request.
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// The record already exists.
    Conflict(String),
    /// Storage or delivery failure. The message is shown to the client, the
    /// cause is only logged.
    Internal { message: String, cause: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    /// Replaces the client-facing message of an internal error.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        match self {
            ApiError::Internal { cause, .. } => ApiError::Internal {
                message: message.into(),
                cause,
            },
            other => other,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal { message, cause } => {
                tracing::error!(error = %cause, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadySubscribed(_) => {
                ApiError::Conflict("This email is already subscribed".to_string())
            }
            StoreError::DuplicateOrder(order_id) => {
                ApiError::Conflict(format!("Order {order_id} already exists"))
            }
            other => ApiError::internal("Database error", other),
        }
    }
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        ApiError::internal("Failed to send email", err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        ApiError::BadRequest("Invalid request body".to_string())
    }
}
