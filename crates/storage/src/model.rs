//! Rows of the shop database.

use chrono::{DateTime, Utc};
use common::{CustomerDetails, OrderLine, OrderPayload, SubscribeRequest};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE: &str = "unknown";
pub const DEFAULT_PAGE: &str = "/";
pub const ORDER_STATUS_NEW: &str = "new";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub source: String,
    pub page: String,
    pub subscription_date: DateTime<Utc>,
    pub welcome_email_sent: bool,
}

/// A subscriber about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub email: String,
    pub source: String,
    pub page: String,
}

impl NewSubscriber {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            source: DEFAULT_SOURCE.to_string(),
            page: DEFAULT_PAGE.to_string(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = page.into();
        self
    }
}

impl From<&SubscribeRequest> for NewSubscriber {
    fn from(request: &SubscribeRequest) -> Self {
        Self {
            email: request.email.trim().to_string(),
            source: request
                .source
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            page: request.page.clone().unwrap_or_else(|| DEFAULT_PAGE.to_string()),
        }
    }
}

/// Counts shown on the admin page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubscriberStats {
    pub total: u64,
    pub welcome_sent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    pub order_id: String,
    pub customer_data: CustomerDetails,
    pub items_data: Vec<OrderLine>,
    pub total: u64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// An order about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_id: String,
    pub customer: CustomerDetails,
    pub items: Vec<OrderLine>,
    pub total: u64,
}

impl From<&OrderPayload> for NewOrder {
    fn from(payload: &OrderPayload) -> Self {
        Self {
            order_id: payload.order_id.to_string(),
            customer: payload.customer.clone(),
            items: payload.items.clone(),
            total: payload.total,
        }
    }
}
