//! HTTP handlers and the state they share.

pub mod admin;
pub mod newsletter;
pub mod orders;
pub mod pages;
pub mod status;

use std::time::Instant;

use storage::ShopStore;

use crate::mailer::{Mail, MailError, Mailer};

/// Shared application state accessible from all handlers.
pub struct AppState<S: ShopStore, M: Mailer> {
    pub store: S,
    pub mailer: M,
}

impl<S: ShopStore, M: Mailer> AppState<S, M> {
    pub fn new(store: S, mailer: M) -> Self {
        Self { store, mailer }
    }

    /// Sends one message and records the outcome in metrics.
    pub(crate) async fn deliver(&self, mail: Mail) -> Result<(), MailError> {
        let start = Instant::now();
        let result = self.mailer.send(mail).await;
        metrics::histogram!("email_send_duration_seconds").record(start.elapsed().as_secs_f64());

        match &result {
            Ok(()) => metrics::counter!("emails_sent_total").increment(1),
            Err(e) => {
                metrics::counter!("emails_failed_total").increment(1);
                tracing::warn!(error = %e, "email delivery failed");
            }
        }
        result
    }
}
