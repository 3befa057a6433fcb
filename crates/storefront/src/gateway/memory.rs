//! In-memory backend for tests and offline sessions.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use common::{OrderAccepted, OrderPayload, SubscribeRequest, SubscribeResponse};

use super::Backend;
use crate::error::GatewayError;

/// A failure the in-memory backend can be told to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFailure {
    Rejected { status: u16, reason: Option<String> },
    Transport,
    Malformed,
}

impl ScriptedFailure {
    pub fn rejected(status: u16, reason: impl Into<String>) -> Self {
        ScriptedFailure::Rejected {
            status,
            reason: Some(reason.into()),
        }
    }

    fn into_error(self) -> GatewayError {
        match self {
            ScriptedFailure::Rejected { status, reason } => GatewayError::Rejected { status, reason },
            ScriptedFailure::Transport => GatewayError::Transport("connection refused".to_string()),
            ScriptedFailure::Malformed => {
                GatewayError::MalformedResponse("expected value at line 1 column 1".to_string())
            }
        }
    }
}

#[derive(Debug, Default)]
struct InMemoryBackendState {
    orders: Vec<OrderPayload>,
    order_ids: HashSet<String>,
    subscribers: Vec<SubscribeRequest>,
    order_failures: VecDeque<ScriptedFailure>,
    subscribe_failures: VecDeque<ScriptedFailure>,
}

/// Backend that records what it receives and answers like the real one.
///
/// Queued failures are consumed one per call, in order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<InMemoryBackendState>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `place_order` call fail with `failure`.
    pub fn fail_next_order(&self, failure: ScriptedFailure) {
        self.lock().order_failures.push_back(failure);
    }

    /// Makes the next `subscribe` call fail with `failure`.
    pub fn fail_next_subscribe(&self, failure: ScriptedFailure) {
        self.lock().subscribe_failures.push_back(failure);
    }

    /// Orders accepted so far.
    pub fn orders(&self) -> Vec<OrderPayload> {
        self.lock().orders.clone()
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    /// Subscription requests accepted so far.
    pub fn subscribers(&self) -> Vec<SubscribeRequest> {
        self.lock().subscribers.clone()
    }

    fn lock(&self) -> MutexGuard<'_, InMemoryBackendState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn place_order(&self, order: &OrderPayload) -> Result<OrderAccepted, GatewayError> {
        let mut state = self.lock();

        if let Some(failure) = state.order_failures.pop_front() {
            return Err(failure.into_error());
        }

        if order.items.is_empty() {
            return Err(GatewayError::Rejected {
                status: 400,
                reason: Some("Invalid order data".to_string()),
            });
        }

        if !state.order_ids.insert(order.order_id.to_string()) {
            return Err(GatewayError::Rejected {
                status: 409,
                reason: Some("Order already exists".to_string()),
            });
        }

        state.orders.push(order.clone());
        Ok(OrderAccepted {
            success: true,
            message: "Order placed! Check your email.".to_string(),
            order_id: order.order_id.to_string(),
            email_sent: Some(true),
        })
    }

    async fn subscribe(
        &self,
        request: &SubscribeRequest,
    ) -> Result<SubscribeResponse, GatewayError> {
        let mut state = self.lock();

        if let Some(failure) = state.subscribe_failures.pop_front() {
            return Err(failure.into_error());
        }

        if state.subscribers.iter().any(|s| s.email == request.email) {
            return Err(GatewayError::Rejected {
                status: 409,
                reason: Some("This email is already subscribed".to_string()),
            });
        }

        state.subscribers.push(request.clone());
        Ok(SubscribeResponse {
            success: true,
            message: "Thanks for subscribing! Check your email.".to_string(),
            welcome_email_sent: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CustomerDetails, OrderId, OrderLine};

    fn order(id: &str) -> OrderPayload {
        OrderPayload {
            customer: CustomerDetails::default(),
            items: vec![OrderLine {
                id: "p1".to_string(),
                name: "Hoodie".to_string(),
                price: 2000,
                image: String::new(),
                size: "M".to_string(),
                quantity: 1,
            }],
            total: 2000,
            date: "2026-01-01T00:00:00Z".to_string(),
            order_id: OrderId::new(id),
        }
    }

    #[tokio::test]
    async fn test_accepts_and_records_order() {
        let backend = InMemoryBackend::new();
        let ack = backend.place_order(&order("ORD-1")).await.unwrap();

        assert!(ack.success);
        assert_eq!(ack.order_id, "ORD-1");
        assert_eq!(backend.order_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_order_id_is_rejected() {
        let backend = InMemoryBackend::new();
        backend.place_order(&order("ORD-1")).await.unwrap();

        let err = backend.place_order(&order("ORD-1")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { status: 409, .. }));
        assert_eq!(backend.order_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failures_are_consumed_in_order() {
        let backend = InMemoryBackend::new();
        backend.fail_next_order(ScriptedFailure::Transport);
        backend.fail_next_order(ScriptedFailure::rejected(500, "db down"));

        let first = backend.place_order(&order("ORD-1")).await.unwrap_err();
        assert!(matches!(first, GatewayError::Transport(_)));

        let second = backend.place_order(&order("ORD-1")).await.unwrap_err();
        assert_eq!(second.reason(), Some("db down"));

        assert!(backend.place_order(&order("ORD-1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_subscription() {
        let backend = InMemoryBackend::new();
        let request = SubscribeRequest {
            email: "a@b.co".to_string(),
            source: Some("website".to_string()),
            page: Some("/".to_string()),
        };

        backend.subscribe(&request).await.unwrap();
        let err = backend.subscribe(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { status: 409, .. }));
        assert_eq!(backend.subscribers().len(), 1);
    }
}
