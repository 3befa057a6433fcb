//! Client side of the shop backend.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use common::{OrderAccepted, OrderPayload, SubscribeRequest, SubscribeResponse};

use crate::error::GatewayError;

pub use http::{BackendConfig, HttpBackend};
pub use memory::{InMemoryBackend, ScriptedFailure};

/// The two backend calls the storefront makes.
///
/// Implementations resolve each call exactly once: a positive
/// acknowledgement or a `GatewayError`. Only an `Ok` may clear the cart.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Sends an order and waits for the acknowledgement.
    async fn place_order(&self, order: &OrderPayload) -> Result<OrderAccepted, GatewayError>;

    /// Subscribes an email address to the newsletter.
    async fn subscribe(&self, request: &SubscribeRequest)
    -> Result<SubscribeResponse, GatewayError>;
}
