//! Newsletter subscribe form.

use std::time::{Duration, Instant};

use common::{SubscribeRequest, SubscribeResponse};

use crate::error::SubscribeError;
use crate::gateway::Backend;

/// Source tag sent with every subscription from the site.
pub const NEWSLETTER_SOURCE: &str = "website";

/// How long the success or error state stays visible.
pub const FORM_STATE_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// State of the subscribe form on one page.
#[derive(Debug, Clone)]
pub struct NewsletterForm {
    page: String,
    state: SubscribeState,
    hide_at: Option<Instant>,
    display: Duration,
}

impl NewsletterForm {
    /// Creates the form for the page at `page` (its URL path).
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            state: SubscribeState::Idle,
            hide_at: None,
            display: FORM_STATE_DURATION,
        }
    }

    pub fn with_display_duration(mut self, display: Duration) -> Self {
        self.display = display;
        self
    }

    pub fn state(&self) -> &SubscribeState {
        &self.state
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Subscribes `email`, moving the form to its success or error state.
    ///
    /// Addresses without an `@` and a `.` are refused without a request.
    #[tracing::instrument(skip(self, backend), fields(page = %self.page))]
    pub async fn submit<B>(
        &mut self,
        backend: &B,
        email: &str,
    ) -> Result<SubscribeResponse, SubscribeError>
    where
        B: Backend + ?Sized,
    {
        let email = email.trim();
        if !email.contains('@') || !email.contains('.') {
            let err = SubscribeError::InvalidEmail(email.to_string());
            self.settle(SubscribeState::Failed(err.user_message()));
            return Err(err);
        }

        let request = SubscribeRequest {
            email: email.to_string(),
            source: Some(NEWSLETTER_SOURCE.to_string()),
            page: Some(self.page.clone()),
        };

        self.state = SubscribeState::Submitting;
        match backend.subscribe(&request).await {
            Ok(response) => {
                tracing::info!("newsletter subscription accepted");
                self.settle(SubscribeState::Succeeded);
                Ok(response)
            }
            Err(e) => {
                let err = SubscribeError::from(e);
                tracing::warn!(error = %err, "newsletter subscription failed");
                self.settle(SubscribeState::Failed(err.user_message()));
                Err(err)
            }
        }
    }

    /// Hides the success or error state once its display time is over.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.state = SubscribeState::Idle;
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }

    fn settle(&mut self, state: SubscribeState) {
        self.state = state;
        self.hide_at = Some(Instant::now() + self.display);
    }
}
