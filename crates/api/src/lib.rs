//! HTTP backend for the MOS storefront.
//!
//! Serves the newsletter and order endpoints, the admin page and the static
//! site, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod email;
pub mod error;
pub mod mailer;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::ShopStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use mailer::{InMemoryMailer, Mail, MailError, Mailer, SmtpMailer};
pub use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: ShopStore + 'static, M: Mailer + 'static>(
    state: Arc<AppState<S, M>>,
    metrics_handle: PrometheusHandle,
    static_dir: impl AsRef<Path>,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::status::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::status::health))
        .route("/subscribe", post(routes::newsletter::subscribe::<S, M>))
        .route("/subscribers", get(routes::newsletter::list::<S, M>))
        .route("/send-newsletter", post(routes::newsletter::send::<S, M>))
        .route("/api/order", post(routes::orders::place::<S, M>))
        .route("/api/orders", get(routes::orders::list::<S, M>))
        .route("/admin", get(routes::admin::page::<S, M>))
        .with_state(state)
        .merge(metrics_router)
        .merge(routes::pages::router(static_dir.as_ref()))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
