//! Newsletter subscription and broadcast endpoints.

use std::sync::{Arc, LazyLock};

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use common::{SubscribeRequest, SubscribeResponse};
use regex::Regex;
use serde::{Deserialize, Serialize};
use storage::{NewSubscriber, ShopStore, Subscriber};

use super::AppState;
use crate::email;
use crate::error::ApiError;
use crate::mailer::Mailer;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct NewsletterSent {
    pub success: bool,
    pub message: String,
    pub recipients: usize,
}

/// POST /subscribe: add a subscriber and send the welcome email.
///
/// A welcome email that fails to go out does not fail the request; the
/// response reports it as `welcomeEmailSent: false`.
#[tracing::instrument(skip(state, payload))]
pub async fn subscribe<S: ShopStore + 'static, M: Mailer + 'static>(
    State(state): State<Arc<AppState<S, M>>>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let Json(request) = payload?;

    if !EMAIL_RE.is_match(request.email.trim()) {
        return Err(ApiError::bad_request("Invalid email address"));
    }

    let subscriber = state.store.add_subscriber(NewSubscriber::from(&request)).await?;
    metrics::counter!("subscribers_created_total").increment(1);
    tracing::info!(email = %subscriber.email, source = %subscriber.source, "new subscriber");

    let welcome_email_sent = send_welcome(&state, &subscriber.email).await;

    Ok(Json(SubscribeResponse {
        success: true,
        message: "Thanks for subscribing! Check your email.".to_string(),
        welcome_email_sent,
    }))
}

async fn send_welcome<S: ShopStore, M: Mailer>(state: &AppState<S, M>, address: &str) -> bool {
    let delivered = match email::welcome(address) {
        Ok(mail) => state.deliver(mail).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render welcome email");
            false
        }
    };

    if delivered && let Err(e) = state.store.mark_welcome_sent(address).await {
        tracing::warn!(error = %e, email = address, "failed to record welcome email");
    }
    delivered
}

/// GET /subscribers: all subscribers, newest first.
#[tracing::instrument(skip(state))]
pub async fn list<S: ShopStore + 'static, M: Mailer + 'static>(
    State(state): State<Arc<AppState<S, M>>>,
) -> Result<Json<Vec<Subscriber>>, ApiError> {
    Ok(Json(state.store.list_subscribers().await?))
}

/// POST /send-newsletter: one message to every subscriber, all in BCC.
#[tracing::instrument(skip(state, payload))]
pub async fn send<S: ShopStore + 'static, M: Mailer + 'static>(
    State(state): State<Arc<AppState<S, M>>>,
    payload: Result<Json<NewsletterRequest>, JsonRejection>,
) -> Result<Json<NewsletterSent>, ApiError> {
    let Json(request) = payload?;

    if request.subject.trim().is_empty() || request.message.trim().is_empty() {
        return Err(ApiError::bad_request("Subject and message are required"));
    }

    let recipients = state.store.subscriber_emails().await?;
    if recipients.is_empty() {
        return Err(ApiError::bad_request("No subscribers to send to"));
    }

    let count = recipients.len();
    let mail = email::newsletter(&request.subject, &request.message, recipients)?;
    state
        .deliver(mail)
        .await
        .map_err(|e| ApiError::from(e).with_message("Failed to send newsletter"))?;

    metrics::counter!("newsletters_sent_total").increment(1);
    tracing::info!(recipients = count, "newsletter sent");

    Ok(Json(NewsletterSent {
        success: true,
        message: format!("Newsletter sent to {count} subscribers"),
        recipients: count,
    }))
}
