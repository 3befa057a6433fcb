//! Storefront error types.

use thiserror::Error;

use crate::validation::FieldError;

/// Failures talking to the shop backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response (refused, reset, timed out).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("Backend rejected request with status {status}")]
    Rejected { status: u16, reason: Option<String> },

    /// A 2xx response that is not a positive acknowledgement.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// The backend's own `error` text, when it sent one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

/// Reasons a checkout submission did not complete.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more form fields failed validation.
    #[error("Validation failed: {}", join_messages(.0, "; "))]
    Validation(Vec<FieldError>),

    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// The backend did not confirm the order.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl CheckoutError {
    /// Text shown to the customer for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Validation(errors) => join_messages(errors, "\n"),
            CheckoutError::EmptyCart => "Cart is empty!".to_string(),
            CheckoutError::Gateway(GatewayError::Transport(_)) => "Connection error".to_string(),
            CheckoutError::Gateway(e) => e.reason().unwrap_or("Server error").to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CheckoutError::Validation(_))
    }
}

fn join_messages(errors: &[FieldError], separator: &str) -> String {
    errors
        .iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Reasons a newsletter subscription did not go through.
#[derive(Debug, Error)]
pub enum SubscribeError {
    /// Rejected before any request was made.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SubscribeError {
    /// Text shown in the form's error state.
    pub fn user_message(&self) -> String {
        match self {
            SubscribeError::InvalidEmail(_) => "Enter a valid email".to_string(),
            SubscribeError::Gateway(GatewayError::Transport(_)) => "Connection error".to_string(),
            SubscribeError::Gateway(e) => e.reason().unwrap_or("Error").to_string(),
        }
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
