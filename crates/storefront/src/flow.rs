//! Checkout: validate, package the cart, submit, and settle the UI.

use cart::{CartStorage, CartStore, CartView, CheckoutState, NotificationCenter, ViewSurface};
use common::{CustomerDetails, OrderAccepted, OrderPayload};

use crate::error::{CheckoutError, Result};
use crate::gateway::Backend;
use crate::order_id::OrderIdGenerator;
use crate::validation::{CheckoutForm, validate};

/// Drives order submission against a `Backend`.
///
/// The cart is cleared only after the backend positively acknowledges the
/// order. Every other outcome leaves the cart and its snapshot untouched
/// and the form ready for another attempt.
#[derive(Debug)]
pub struct OrderFlow<B: Backend> {
    backend: B,
    ids: OrderIdGenerator,
}

impl<B: Backend> OrderFlow<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ids: OrderIdGenerator::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshots the cart into an order with a fresh id and timestamp.
    pub fn build_payload<S: CartStorage>(
        &self,
        store: &CartStore<S>,
        customer: CustomerDetails,
    ) -> OrderPayload {
        OrderPayload {
            customer,
            items: store.order_lines(),
            total: store.total(),
            date: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            order_id: self.ids.next(),
        }
    }

    /// Submits the cart as an order.
    ///
    /// Validation runs first and reports every failing field at once; an
    /// empty cart is refused after that. While the request is in flight the
    /// submit button is disabled, and it is re-enabled whatever the outcome.
    #[tracing::instrument(skip_all, fields(lines = store.len()))]
    pub async fn submit<S, V>(
        &self,
        store: &mut CartStore<S>,
        view: &mut CartView<V>,
        notices: &mut NotificationCenter,
        form: &CheckoutForm,
    ) -> Result<OrderAccepted>
    where
        S: CartStorage,
        V: ViewSurface,
    {
        let outcome = self.try_submit(store, view, form).await;

        match &outcome {
            Ok(ack) => {
                tracing::info!(order_id = %ack.order_id, "order accepted");
                metrics::counter!("checkout_orders_accepted_total").increment(1);
                view.show_checkout_state(&CheckoutState::Succeeded);
                let message = if ack.message.is_empty() {
                    "Order placed!".to_string()
                } else {
                    ack.message.clone()
                };
                notices.notify(message);
            }
            Err(e) => {
                if !e.is_validation() {
                    tracing::warn!(error = %e, "order submission failed");
                }
                metrics::counter!("checkout_orders_failed_total").increment(1);
                let message = e.user_message();
                view.show_checkout_state(&CheckoutState::Failed(message.clone()));
                notices.notify(match e {
                    CheckoutError::Validation(_) | CheckoutError::EmptyCart => message,
                    CheckoutError::Gateway(_) => format!("Error: {message}"),
                });
            }
        }

        view.show_notice(notices.current());
        outcome
    }

    async fn try_submit<S, V>(
        &self,
        store: &mut CartStore<S>,
        view: &mut CartView<V>,
        form: &CheckoutForm,
    ) -> Result<OrderAccepted>
    where
        S: CartStorage,
        V: ViewSurface,
    {
        let errors = validate(form);
        if !errors.is_empty() {
            return Err(CheckoutError::Validation(errors));
        }

        if store.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let payload = self.build_payload(store, form.to_customer());
        tracing::debug!(order_id = %payload.order_id, total = payload.total, "submitting order");

        view.show_checkout_state(&CheckoutState::Submitting);
        let result = self.backend.place_order(&payload).await;
        view.show_checkout_state(&CheckoutState::Idle);

        let ack = result?;
        store.clear();
        view.refresh(store);
        Ok(ack)
    }
}
