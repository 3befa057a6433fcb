//! Persistence for the shop backend.
//!
//! `ShopStore` is implemented by `SqliteShopStore` for production and by
//! `InMemoryShopStore` for tests.

pub mod error;
pub mod memory;
pub mod model;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryShopStore;
pub use model::{
    DEFAULT_PAGE, DEFAULT_SOURCE, NewOrder, NewSubscriber, ORDER_STATUS_NEW, OrderRecord,
    Subscriber, SubscriberStats,
};
pub use sqlite::SqliteShopStore;
pub use store::ShopStore;
