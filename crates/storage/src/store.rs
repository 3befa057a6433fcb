use async_trait::async_trait;

use crate::{NewOrder, NewSubscriber, OrderRecord, Result, Subscriber, SubscriberStats};

/// Persistence for newsletter subscribers and placed orders.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Inserts a subscriber.
    ///
    /// Fails with `AlreadySubscribed` if the email is already present; the
    /// existing row is left as it was.
    async fn add_subscriber(&self, subscriber: NewSubscriber) -> Result<Subscriber>;

    /// Records that the welcome email reached `email`. Returns false if no
    /// such subscriber exists.
    async fn mark_welcome_sent(&self, email: &str) -> Result<bool>;

    /// All subscribers, newest first.
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>>;

    /// Addresses of all subscribers.
    async fn subscriber_emails(&self) -> Result<Vec<String>>;

    async fn subscriber_stats(&self) -> Result<SubscriberStats>;

    /// Stores an order with status `new`.
    ///
    /// Fails with `DuplicateOrder` if the order id is taken.
    async fn save_order(&self, order: NewOrder) -> Result<OrderRecord>;

    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<OrderRecord>>;
}
