use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    NewOrder, NewSubscriber, ORDER_STATUS_NEW, OrderRecord, Result, ShopStore, StoreError,
    Subscriber, SubscriberStats,
};

#[derive(Debug, Default)]
struct Tables {
    subscribers: Vec<Subscriber>,
    orders: Vec<OrderRecord>,
}

/// In-memory shop store for testing.
///
/// Behaves like the SQLite implementation, and can be switched into a
/// failing mode where every call returns a database error.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShopStore {
    tables: Arc<RwLock<Tables>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryShopStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ShopStore for InMemoryShopStore {
    async fn add_subscriber(&self, subscriber: NewSubscriber) -> Result<Subscriber> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if tables.subscribers.iter().any(|s| s.email == subscriber.email) {
            return Err(StoreError::AlreadySubscribed(subscriber.email));
        }

        let row = Subscriber {
            id: tables.subscribers.len() as i64 + 1,
            email: subscriber.email,
            source: subscriber.source,
            page: subscriber.page,
            subscription_date: Utc::now(),
            welcome_email_sent: false,
        };
        tables.subscribers.push(row.clone());
        Ok(row)
    }

    async fn mark_welcome_sent(&self, email: &str) -> Result<bool> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        match tables.subscribers.iter_mut().find(|s| s.email == email) {
            Some(subscriber) => {
                subscriber.welcome_email_sent = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_subscribers(&self) -> Result<Vec<Subscriber>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.subscribers.iter().rev().cloned().collect())
    }

    async fn subscriber_emails(&self) -> Result<Vec<String>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.subscribers.iter().map(|s| s.email.clone()).collect())
    }

    async fn subscriber_stats(&self) -> Result<SubscriberStats> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(SubscriberStats {
            total: tables.subscribers.len() as u64,
            welcome_sent: tables
                .subscribers
                .iter()
                .filter(|s| s.welcome_email_sent)
                .count() as u64,
        })
    }

    async fn save_order(&self, order: NewOrder) -> Result<OrderRecord> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if tables.orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(StoreError::DuplicateOrder(order.order_id));
        }

        let record = OrderRecord {
            id: tables.orders.len() as i64 + 1,
            order_id: order.order_id,
            customer_data: order.customer,
            items_data: order.items,
            total: order.total,
            status: ORDER_STATUS_NEW.to_string(),
            created_at: Utc::now(),
        };
        tables.orders.push(record.clone());
        Ok(record)
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().rev().cloned().collect())
    }
}
