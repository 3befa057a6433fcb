//! Integration tests for the SQLite store against real database files.

use sqlx::sqlite::SqlitePoolOptions;
use storage::{NewSubscriber, ShopStore, SqliteShopStore, schema};

async fn file_pool(dir: &tempfile::TempDir) -> sqlx::SqlitePool {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("newsletter.db").display());
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .unwrap()
}

#[tokio::test]
async fn data_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("newsletter.db").display());

    {
        let store = SqliteShopStore::connect(&url).await.unwrap();
        store
            .add_subscriber(NewSubscriber::new("fan@example.com").with_page("/category"))
            .await
            .unwrap();
        store.pool().close().await;
    }

    let store = SqliteShopStore::connect(&url).await.unwrap();
    let subscribers = store.list_subscribers().await.unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].page, "/category");
}

#[tokio::test]
async fn bootstrap_creates_both_tables() {
    let dir = tempfile::tempdir().unwrap();
    let pool = file_pool(&dir).await;

    let store = SqliteShopStore::new(pool.clone());
    store.bootstrap().await.unwrap();
    store.bootstrap().await.unwrap();

    let tables = schema::table_names(&pool).await.unwrap();
    assert_eq!(tables, vec!["orders", "subscribers"]);
}

#[tokio::test]
async fn legacy_table_gains_source_column() {
    let dir = tempfile::tempdir().unwrap();
    let pool = file_pool(&dir).await;

    sqlx::query(
        "CREATE TABLE subscribers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT UNIQUE NOT NULL,
            page TEXT DEFAULT '/',
            subscription_date DATETIME DEFAULT CURRENT_TIMESTAMP,
            welcome_email_sent BOOLEAN DEFAULT 0
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO subscribers (email) VALUES ('old@example.com')")
        .execute(&pool)
        .await
        .unwrap();

    let store = SqliteShopStore::new(pool);
    store.bootstrap().await.unwrap();

    let subscribers = store.list_subscribers().await.unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].email, "old@example.com");
    assert_eq!(subscribers[0].source, "website");
    assert!(!subscribers[0].welcome_email_sent);
}
