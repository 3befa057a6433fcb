use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::{
    NewOrder, NewSubscriber, ORDER_STATUS_NEW, OrderRecord, Result, ShopStore, StoreError,
    Subscriber, SubscriberStats, schema,
};

const SUBSCRIBER_COLUMNS: &str =
    "id, email, source, page, subscription_date, welcome_email_sent";
const ORDER_COLUMNS: &str =
    "id, order_id, customer_data, items_data, total, status, created_at";

/// SQLite-backed shop store.
#[derive(Debug, Clone)]
pub struct SqliteShopStore {
    pool: SqlitePool,
}

impl SqliteShopStore {
    /// Wraps an existing pool. Call `bootstrap` before first use.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to `url` and prepares the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        let store = Self::new(pool);
        store.bootstrap().await?;
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` is its own database, so the
    /// pool is pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = Self::new(pool);
        store.bootstrap().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates missing tables and upgrades older ones.
    pub async fn bootstrap(&self) -> Result<()> {
        schema::bootstrap(&self.pool).await
    }

    fn row_to_subscriber(row: SqliteRow) -> Result<Subscriber> {
        Ok(Subscriber {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            source: row
                .try_get::<Option<String>, _>("source")?
                .unwrap_or_else(|| crate::DEFAULT_SOURCE.to_string()),
            page: row
                .try_get::<Option<String>, _>("page")?
                .unwrap_or_else(|| crate::DEFAULT_PAGE.to_string()),
            subscription_date: row.try_get("subscription_date")?,
            welcome_email_sent: row.try_get::<Option<bool>, _>("welcome_email_sent")?.unwrap_or(false),
        })
    }

    fn row_to_order(row: SqliteRow) -> Result<OrderRecord> {
        let customer: String = row.try_get("customer_data")?;
        let items: String = row.try_get("items_data")?;
        let total: i64 = row.try_get("total")?;

        Ok(OrderRecord {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            customer_data: serde_json::from_str(&customer)?,
            items_data: serde_json::from_str(&items)?,
            total: u64::try_from(total).unwrap_or(0),
            status: row
                .try_get::<Option<String>, _>("status")?
                .unwrap_or_else(|| ORDER_STATUS_NEW.to_string()),
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ShopStore for SqliteShopStore {
    #[tracing::instrument(skip(self, subscriber), fields(source = %subscriber.source))]
    async fn add_subscriber(&self, subscriber: NewSubscriber) -> Result<Subscriber> {
        let now: DateTime<Utc> = Utc::now();
        let row = sqlx::query(&format!(
            "INSERT OR IGNORE INTO subscribers (email, source, page, subscription_date, welcome_email_sent) \
             VALUES (?, ?, ?, ?, 0) RETURNING {SUBSCRIBER_COLUMNS}"
        ))
        .bind(&subscriber.email)
        .bind(&subscriber.source)
        .bind(&subscriber.page)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_subscriber(row),
            None => Err(StoreError::AlreadySubscribed(subscriber.email)),
        }
    }

    async fn mark_welcome_sent(&self, email: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE subscribers SET welcome_email_sent = 1 WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_subscribers(&self) -> Result<Vec<Subscriber>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers ORDER BY subscription_date DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_subscriber).collect()
    }

    async fn subscriber_emails(&self) -> Result<Vec<String>> {
        let emails = sqlx::query_scalar("SELECT email FROM subscribers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(emails)
    }

    async fn subscriber_stats(&self) -> Result<SubscriberStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, \
             COALESCE(SUM(CASE WHEN welcome_email_sent = 1 THEN 1 ELSE 0 END), 0) AS sent \
             FROM subscribers",
        )
        .fetch_one(&self.pool)
        .await?;

        let total: i64 = row.try_get("total")?;
        let sent: i64 = row.try_get("sent")?;
        Ok(SubscriberStats {
            total: u64::try_from(total).unwrap_or(0),
            welcome_sent: u64::try_from(sent).unwrap_or(0),
        })
    }

    #[tracing::instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn save_order(&self, order: NewOrder) -> Result<OrderRecord> {
        let total = i64::try_from(order.total)
            .map_err(|_| StoreError::InvalidData(format!("order total {} too large", order.total)))?;
        let customer = serde_json::to_string(&order.customer)?;
        let items = serde_json::to_string(&order.items)?;
        let now: DateTime<Utc> = Utc::now();

        let row = sqlx::query(&format!(
            "INSERT INTO orders (order_id, customer_data, items_data, total, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&order.order_id)
        .bind(customer)
        .bind(items)
        .bind(total)
        .bind(ORDER_STATUS_NEW)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::DuplicateOrder(order.order_id.clone());
            }
            StoreError::Database(e)
        })?;

        Self::row_to_order(row)
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CustomerDetails, OrderLine};

    fn order(id: &str) -> NewOrder {
        NewOrder {
            order_id: id.to_string(),
            customer: CustomerDetails {
                name: "Ivanov Ivan Ivanovich".to_string(),
                email: "ivan@example.com".to_string(),
                ..Default::default()
            },
            items: vec![OrderLine {
                id: "p1".to_string(),
                name: "Hoodie".to_string(),
                price: 2000,
                image: String::new(),
                size: "M".to_string(),
                quantity: 2,
            }],
            total: 4000,
        }
    }

    #[tokio::test]
    async fn test_subscribe_twice() {
        let store = SqliteShopStore::in_memory().await.unwrap();

        let first = store
            .add_subscriber(NewSubscriber::new("fan@example.com").with_source("website"))
            .await
            .unwrap();
        assert_eq!(first.source, "website");
        assert_eq!(first.page, "/");
        assert!(!first.welcome_email_sent);

        let err = store
            .add_subscriber(NewSubscriber::new("fan@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadySubscribed(_)));

        let all = store.list_subscribers().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].source, "website");
    }

    #[tokio::test]
    async fn test_welcome_flag_and_stats() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        store.add_subscriber(NewSubscriber::new("a@x.io")).await.unwrap();
        store.add_subscriber(NewSubscriber::new("b@x.io")).await.unwrap();

        assert!(store.mark_welcome_sent("a@x.io").await.unwrap());
        assert!(!store.mark_welcome_sent("nobody@x.io").await.unwrap());

        let stats = store.subscriber_stats().await.unwrap();
        assert_eq!(stats, SubscriberStats { total: 2, welcome_sent: 1 });
        assert_eq!(store.subscriber_emails().await.unwrap(), vec!["a@x.io", "b@x.io"]);
    }

    #[tokio::test]
    async fn test_stats_on_empty_table() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        assert_eq!(store.subscriber_stats().await.unwrap(), SubscriberStats::default());
    }

    #[tokio::test]
    async fn test_save_and_list_orders() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        let saved = store.save_order(order("ORD-1")).await.unwrap();

        assert_eq!(saved.status, "new");
        assert_eq!(saved.total, 4000);
        assert_eq!(saved.items_data[0].quantity, 2);

        store.save_order(order("ORD-2")).await.unwrap();
        let orders = store.list_orders().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, "ORD-2");
        assert_eq!(orders[1].customer_data.name, "Ivanov Ivan Ivanovich");
    }

    #[tokio::test]
    async fn test_duplicate_order() {
        let store = SqliteShopStore::in_memory().await.unwrap();
        store.save_order(order("ORD-1")).await.unwrap();

        let err = store.save_order(order("ORD-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateOrder(id) if id == "ORD-1"));
        assert_eq!(store.list_orders().await.unwrap().len(), 1);
    }
}
