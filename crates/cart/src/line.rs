//! Cart lines and the product input they are created from.

use common::{DEFAULT_SIZE, OrderLine, default_size};
use serde::{Deserialize, Serialize};

/// One distinct (product, size) pairing held in the cart.
///
/// Serialized with the short field names used by the persisted snapshot and
/// by the order payload (`id`, `name`, `price`, `image`, `size`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: String,

    #[serde(rename = "name")]
    pub display_name: String,

    /// Price per unit in the smallest currency unit.
    #[serde(rename = "price")]
    pub unit_price: u64,

    #[serde(rename = "image", default)]
    pub image_ref: String,

    #[serde(default = "default_size")]
    pub size: String,

    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLine {
    /// Returns true if this line is the given (product, size) pair.
    pub fn matches(&self, product_id: &str, size: &str) -> bool {
        self.product_id == product_id && self.size == size
    }

    /// Returns true unless the size is the sentinel.
    pub fn has_size(&self) -> bool {
        self.size != DEFAULT_SIZE
    }

    /// Unit price × quantity.
    pub fn subtotal(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }

    /// Display name with the size in parentheses when there is one.
    pub fn label(&self) -> String {
        if self.has_size() {
            format!("{} ({})", self.display_name, self.size)
        } else {
            self.display_name.clone()
        }
    }
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        OrderLine {
            id: line.product_id.clone(),
            name: line.display_name.clone(),
            price: line.unit_price,
            image: line.image_ref.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
        }
    }
}

/// Raw price as it comes from a product card: a number or its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Amount(i64),
    Fractional(f64),
    Text(String),
}

impl PriceInput {
    /// Coerces to a non-negative integer price.
    ///
    /// Text is read like an integer prefix (`"2000 ₽"` → 2000); anything
    /// non-numeric or negative becomes 0.
    pub fn coerce(&self) -> u64 {
        match self {
            PriceInput::Amount(n) => u64::try_from(*n).unwrap_or(0),
            PriceInput::Fractional(f) if f.is_finite() && *f > 0.0 => f.trunc() as u64,
            PriceInput::Fractional(_) => 0,
            PriceInput::Text(text) => parse_leading_integer(text),
        }
    }
}

impl From<i64> for PriceInput {
    fn from(n: i64) -> Self {
        PriceInput::Amount(n)
    }
}

impl From<u64> for PriceInput {
    fn from(n: u64) -> Self {
        PriceInput::Amount(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for PriceInput {
    fn from(f: f64) -> Self {
        PriceInput::Fractional(f)
    }
}

impl From<&str> for PriceInput {
    fn from(s: &str) -> Self {
        PriceInput::Text(s.to_string())
    }
}

impl From<String> for PriceInput {
    fn from(s: String) -> Self {
        PriceInput::Text(s)
    }
}

fn parse_leading_integer(text: &str) -> u64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let value = digits
        .chars()
        .take_while(char::is_ascii_digit)
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)));

    if negative { 0 } else { value }
}

/// A product as offered to `CartStore::add_item`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: PriceInput,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_size")]
    pub size: String,
}

impl Product {
    /// Creates a product without image or size.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: impl Into<PriceInput>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            image: String::new(),
            size: default_size(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }
}
