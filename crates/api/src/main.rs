//! API server entry point.

use std::sync::Arc;

use api::config::Config;
use api::{AppState, InMemoryMailer, Mailer, SmtpMailer};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::SqliteShopStore;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<M: Mailer + 'static>(
    config: &Config,
    state: AppState<SqliteShopStore, M>,
    metrics_handle: PrometheusHandle,
) {
    let app = api::create_app(Arc::new(state), metrics_handle, &config.static_dir);

    let addr = config.addr();
    tracing::info!(%addr, static_dir = %config.static_dir, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

#[tokio::main]
async fn main() {
    // 1. Load .env and configuration
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    // 2. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 4. Open the database, creating tables if needed
    let store = SqliteShopStore::connect(&config.database_url)
        .await
        .expect("failed to open database");
    tracing::info!(url = %config.database_url, "database ready");

    // 5. Pick the mailer and start the server
    match &config.smtp {
        Some(smtp) => {
            let mailer = SmtpMailer::new(smtp).expect("invalid SMTP configuration");
            tracing::info!(host = %smtp.host, from = %smtp.from_address, "SMTP mailer configured");
            serve(&config, AppState::new(store, mailer), metrics_handle).await;
        }
        None => {
            tracing::warn!("SMTP_USERNAME not set, outgoing mail is only logged");
            serve(&config, AppState::new(store, InMemoryMailer::new()), metrics_handle).await;
        }
    }

    tracing::info!("server shut down gracefully");
}
