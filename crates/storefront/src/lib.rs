//! Storefront session logic on top of the cart.
//!
//! This crate provides:
//! - `OrderFlow`: checkout validation and submission
//! - `Backend`: the shop backend, over HTTP or in memory
//! - `NewsletterForm`: the subscribe form
//! - `CatalogFilter`: catalog filter, sort and paging
//! - `Storefront`: a page session tying the cart, view and checkout together

pub mod catalog;
pub mod error;
pub mod flow;
pub mod gateway;
pub mod newsletter;
pub mod order_id;
pub mod session;
pub mod validation;

pub use catalog::{
    CatalogFilter, CatalogItem, Category, PAGE_SIZE, SortMode, Subcategory, infer_subcategory,
    parse_price,
};
pub use error::{CheckoutError, GatewayError, Result, SubscribeError};
pub use flow::OrderFlow;
pub use gateway::{Backend, BackendConfig, HttpBackend, InMemoryBackend, ScriptedFailure};
pub use newsletter::{FORM_STATE_DURATION, NEWSLETTER_SOURCE, NewsletterForm, SubscribeState};
pub use order_id::OrderIdGenerator;
pub use session::Storefront;
pub use validation::{CheckoutForm, Field, FieldError, validate};
