//! Server-rendered admin page.

use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use storage::{ShopStore, Subscriber, SubscriberStats};

use super::AppState;
use crate::error::ApiError;
use crate::mailer::Mailer;

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminPage {
    stats: SubscriberStats,
    subscribers: Vec<Subscriber>,
}

/// GET /admin: subscriber stats, subscriber list and the newsletter form.
#[tracing::instrument(skip(state))]
pub async fn page<S: ShopStore + 'static, M: Mailer + 'static>(
    State(state): State<Arc<AppState<S, M>>>,
) -> Result<Html<String>, ApiError> {
    let stats = state.store.subscriber_stats().await?;
    let subscribers = state.store.list_subscribers().await?;

    let html = AdminPage { stats, subscribers }
        .render()
        .map_err(|e| ApiError::internal("Failed to render page", e))?;
    Ok(Html(html))
}
