//! Client-side cart for the storefront.
//!
//! This crate provides:
//! - `CartStore`: the cart state machine and its snapshot persistence
//! - `CartStorage`: key-value storage the snapshot is written to
//! - `CartView`: projection of the cart into named view slots
//! - `NotificationCenter`: the single transient message shown to the user

pub mod error;
pub mod line;
pub mod notification;
pub mod storage;
pub mod store;
pub mod surface;
pub mod view;

pub use error::{Result, StorageError};
pub use line::{CartLine, PriceInput, Product};
pub use notification::{DEFAULT_NOTICE_DURATION, Notice, NoticeHandle, NotificationCenter};
pub use storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage};
pub use store::CartStore;
pub use surface::{
    CURRENCY, EmptyState, MemorySurface, RowView, Slot, SlotContent, SlotState, ViewSurface,
    format_price,
};
pub use view::{CLEAR_PROMPT, CartCommand, CartView, CheckoutState};

pub use common::DEFAULT_SIZE;
