//! Order capture endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use common::{CustomerDetails, OrderAccepted, OrderPayload};
use storage::{NewOrder, OrderRecord, ShopStore};

use super::AppState;
use crate::email;
use crate::error::ApiError;
use crate::mailer::Mailer;

/// POST /api/order: store an order and email the confirmation.
///
/// Once the order is stored the request succeeds; a confirmation email that
/// cannot be delivered is reported as `emailSent: false`.
#[tracing::instrument(skip(state, payload))]
pub async fn place<S: ShopStore + 'static, M: Mailer + 'static>(
    State(state): State<Arc<AppState<S, M>>>,
    payload: Result<Json<OrderPayload>, JsonRejection>,
) -> Result<Json<OrderAccepted>, ApiError> {
    let Json(mut order) = payload?;

    if order.items.is_empty() || is_blank(&order.customer) || order.order_id.as_str().trim().is_empty()
    {
        return Err(ApiError::bad_request("Invalid order data"));
    }

    let computed = order.computed_total();
    if computed != order.total {
        tracing::warn!(
            order_id = %order.order_id,
            submitted = order.total,
            computed,
            "order total mismatch, storing computed total"
        );
        order.total = computed;
    }

    state
        .store
        .save_order(NewOrder::from(&order))
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to save order"))?;
    metrics::counter!("orders_placed_total").increment(1);
    tracing::info!(order_id = %order.order_id, total = order.total, items = order.items.len(), "order placed");

    let email_sent = send_confirmation(&state, &order).await;
    let message = if email_sent {
        "Order placed! Check your email."
    } else {
        "Order placed, but the confirmation email could not be sent."
    };

    Ok(Json(OrderAccepted {
        success: true,
        message: message.to_string(),
        order_id: order.order_id.to_string(),
        email_sent: Some(email_sent),
    }))
}

async fn send_confirmation<S: ShopStore, M: Mailer>(
    state: &AppState<S, M>,
    order: &OrderPayload,
) -> bool {
    if order.customer.email.trim().is_empty() {
        return false;
    }

    match email::order_confirmation(order) {
        Ok(mail) => state.deliver(mail).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render order email");
            false
        }
    }
}

fn is_blank(customer: &CustomerDetails) -> bool {
    [
        &customer.name,
        &customer.phone,
        &customer.zip,
        &customer.address,
        &customer.email,
    ]
    .iter()
    .all(|field| field.trim().is_empty())
}

/// GET /api/orders: all orders, newest first.
#[tracing::instrument(skip(state))]
pub async fn list<S: ShopStore + 'static, M: Mailer + 'static>(
    State(state): State<Arc<AppState<S, M>>>,
) -> Result<Json<Vec<OrderRecord>>, ApiError> {
    Ok(Json(state.store.list_orders().await?))
}
