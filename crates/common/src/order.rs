//! Order submission payload and acknowledgement.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_SIZE, default_size};

/// Locally generated order identifier (`ORD-` + 8 digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Builds an id from a millisecond clock reading, keeping its last 8 digits.
    pub fn from_millis(millis: u64) -> Self {
        Self(format!("ORD-{:08}", millis % 100_000_000))
    }

    /// Wraps an id received over the wire.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Contact and delivery details entered on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub address: String,
    pub email: String,
}

/// One cart line as it travels inside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_size")]
    pub size: String,
    pub quantity: u32,
}

impl OrderLine {
    /// Price × quantity, saturating instead of wrapping.
    pub fn subtotal(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }

    /// Name with the size appended in parentheses unless it is the sentinel.
    pub fn label(&self) -> String {
        if self.size == DEFAULT_SIZE {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.size)
        }
    }
}

/// Body of `POST /api/order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub customer: CustomerDetails,
    pub items: Vec<OrderLine>,
    pub total: u64,
    /// ISO-8601 submission timestamp.
    pub date: String,
    pub order_id: OrderId,
}

impl OrderPayload {
    /// Recomputes the total from the lines.
    pub fn computed_total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.subtotal()))
    }
}

/// Successful response of `POST /api/order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAccepted {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub order_id: String,
    /// Whether the confirmation email went out. Absent on older backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(size: &str, price: u64, quantity: u32) -> OrderLine {
        OrderLine {
            id: "p1".to_string(),
            name: "Hoodie".to_string(),
            price,
            image: String::new(),
            size: size.to_string(),
            quantity,
        }
    }

    #[test]
    fn order_id_keeps_last_eight_digits() {
        assert_eq!(OrderId::from_millis(1_717_171_234_567).as_str(), "ORD-71234567");
        assert_eq!(OrderId::from_millis(42).as_str(), "ORD-00000042");
    }

    #[test]
    fn label_omits_sentinel_size() {
        assert_eq!(line(DEFAULT_SIZE, 1, 1).label(), "Hoodie");
        assert_eq!(line("M", 1, 1).label(), "Hoodie (M)");
    }

    #[test]
    fn payload_uses_browser_field_names() {
        let payload = OrderPayload {
            customer: CustomerDetails::default(),
            items: vec![line("M", 2000, 2)],
            total: 4000,
            date: "2025-01-01T00:00:00.000Z".to_string(),
            order_id: OrderId::new("ORD-1"),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["orderId"], "ORD-1");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(payload.computed_total(), 4000);
    }

    #[test]
    fn line_size_defaults_to_sentinel() {
        let line: OrderLine =
            serde_json::from_str(r#"{"id":"p1","name":"Cap","price":500,"quantity":1}"#).unwrap();
        assert_eq!(line.size, DEFAULT_SIZE);
        assert_eq!(line.image, "");
    }

    #[test]
    fn accepted_tolerates_missing_fields() {
        let ack: OrderAccepted =
            serde_json::from_str(r#"{"success":true,"orderId":"ORD-1"}"#).unwrap();
        assert!(ack.success);
        assert_eq!(ack.order_id, "ORD-1");
        assert!(ack.message.is_empty());
        assert_eq!(ack.email_sent, None);
    }
}
