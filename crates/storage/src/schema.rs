//! Table creation and upgrades for the shop database.

use sqlx::{Row, SqlitePool};

use crate::Result;

const CREATE_SUBSCRIBERS: &str = r#"
CREATE TABLE IF NOT EXISTS subscribers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT UNIQUE NOT NULL,
    source TEXT DEFAULT 'unknown',
    page TEXT DEFAULT '/',
    subscription_date DATETIME DEFAULT CURRENT_TIMESTAMP,
    welcome_email_sent BOOLEAN DEFAULT 0
)
"#;

const CREATE_ORDERS: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id TEXT UNIQUE NOT NULL,
    customer_data TEXT NOT NULL,
    items_data TEXT NOT NULL,
    total INTEGER NOT NULL,
    status TEXT DEFAULT 'new',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Creates missing tables and brings older ones up to date.
///
/// Safe to run on every start.
pub async fn bootstrap(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_SUBSCRIBERS).execute(pool).await?;
    sqlx::query(CREATE_ORDERS).execute(pool).await?;

    if !has_column(pool, "subscribers", "source").await? {
        tracing::info!("adding source column to subscribers");
        sqlx::query("ALTER TABLE subscribers ADD COLUMN source TEXT DEFAULT 'website'")
            .execute(pool)
            .await?;
    }

    Ok(())
}

/// Names of the user tables in the database.
pub async fn table_names(pool: &SqlitePool) -> Result<Vec<String>> {
    let names = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(names)
}

async fn has_column(pool: &SqlitePool, table: &str, column: &str) -> Result<bool> {
    let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
        .fetch_all(pool)
        .await?;

    for row in rows {
        let name: String = row.try_get("name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
