//! Wire contract shared by the storefront client and the shop backend.
//!
//! Everything in here is serialized as JSON on the HTTP boundary, so field
//! names follow the browser-facing format (`orderId`, `welcomeEmailSent`).

pub mod newsletter;
pub mod order;

pub use newsletter::{SubscribeRequest, SubscribeResponse};
pub use order::{CustomerDetails, OrderAccepted, OrderId, OrderLine, OrderPayload};

use serde::{Deserialize, Serialize};

/// Size value used for products that have no size dimension.
pub const DEFAULT_SIZE: &str = "default";

/// Returns the sentinel size as an owned string (serde default helper).
pub fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

/// Error body returned by the backend for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
