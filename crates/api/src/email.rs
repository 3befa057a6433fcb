//! Rendering of the transactional emails.

use askama::Template;
use common::{DEFAULT_SIZE, OrderLine, OrderPayload};

use crate::mailer::{Mail, MailError};

pub const WELCOME_SUBJECT: &str = "Welcome to our newsletter! | MOS";

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmailHtml;

#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order: &'a OrderPayload,
    rows: Vec<OrderRow<'a>>,
}

#[derive(Template)]
#[template(path = "email/newsletter.html")]
struct NewsletterHtml<'a> {
    subject: &'a str,
    lines: Vec<&'a str>,
}

/// One row of the order table.
struct OrderRow<'a> {
    name: &'a str,
    size: Option<&'a str>,
    quantity: u32,
    price: u64,
    subtotal: u64,
}

impl<'a> From<&'a OrderLine> for OrderRow<'a> {
    fn from(line: &'a OrderLine) -> Self {
        Self {
            name: &line.name,
            size: (line.size != DEFAULT_SIZE).then_some(line.size.as_str()),
            quantity: line.quantity,
            price: line.price,
            subtotal: line.subtotal(),
        }
    }
}

/// Welcome email for a new subscriber.
pub fn welcome(to: &str) -> Result<Mail, MailError> {
    let html = WelcomeEmailHtml.render()?;
    Ok(Mail::to(to, WELCOME_SUBJECT, html))
}

/// Order confirmation sent to the customer.
pub fn order_confirmation(order: &OrderPayload) -> Result<Mail, MailError> {
    let html = OrderConfirmationHtml {
        order,
        rows: order.items.iter().map(OrderRow::from).collect(),
    }
    .render()?;

    Ok(Mail::to(
        order.customer.email.as_str(),
        order_subject(order.order_id.as_str()),
        html,
    ))
}

pub fn order_subject(order_id: &str) -> String {
    format!("Your order {order_id} has been placed | MOS")
}

/// One newsletter message addressed to every recipient in BCC.
///
/// Line breaks in `message` become `<br>`; the text itself is escaped.
pub fn newsletter(subject: &str, message: &str, recipients: Vec<String>) -> Result<Mail, MailError> {
    let html = NewsletterHtml {
        subject,
        lines: message.lines().collect(),
    }
    .render()?;

    Ok(Mail::bcc(recipients, subject, html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CustomerDetails, OrderId};

    fn order() -> OrderPayload {
        OrderPayload {
            customer: CustomerDetails {
                name: "Ivan Ivanovich Petrov".to_string(),
                phone: "+7 999 500 50 50".to_string(),
                zip: "656000".to_string(),
                address: "Barnaul, Lenina 1".to_string(),
                email: "ivan@example.com".to_string(),
            },
            items: vec![
                OrderLine {
                    id: "p1".to_string(),
                    name: "Hoodie".to_string(),
                    price: 2000,
                    image: String::new(),
                    size: "M".to_string(),
                    quantity: 2,
                },
                OrderLine {
                    id: "p2".to_string(),
                    name: "Pin".to_string(),
                    price: 300,
                    image: String::new(),
                    size: DEFAULT_SIZE.to_string(),
                    quantity: 1,
                },
            ],
            total: 4300,
            date: "2025-01-01T00:00:00.000Z".to_string(),
            order_id: OrderId::new("ORD-12345678"),
        }
    }

    #[test]
    fn test_welcome_mail() {
        let mail = welcome("fan@example.com").unwrap();
        assert_eq!(mail.to, vec!["fan@example.com"]);
        assert_eq!(mail.subject, WELCOME_SUBJECT);
        assert!(mail.html.contains("Thank you for subscribing"));
    }

    #[test]
    fn test_order_confirmation_lists_items() {
        let mail = order_confirmation(&order()).unwrap();

        assert_eq!(mail.to, vec!["ivan@example.com"]);
        assert_eq!(mail.subject, "Your order ORD-12345678 has been placed | MOS");
        assert!(mail.html.contains("Hoodie (M)"));
        assert!(!mail.html.contains("(default)"));
        assert!(mail.html.contains("4000 ₽"));
        assert!(mail.html.contains("4300 ₽"));
        assert!(mail.html.contains("656000, Barnaul, Lenina 1"));
    }

    #[test]
    fn test_order_confirmation_escapes_customer_input() {
        let mut order = order();
        order.customer.name = "<script>x</script> a b".to_string();

        let mail = order_confirmation(&order).unwrap();
        assert!(!mail.html.contains("<script>"));
    }

    #[test]
    fn test_newsletter_breaks_lines() {
        let mail = newsletter(
            "Drop",
            "New hoodies\nin stock <now>",
            vec!["a@example.com".to_string(), "b@example.com".to_string()],
        )
        .unwrap();

        assert!(mail.to.is_empty());
        assert_eq!(mail.bcc.len(), 2);
        assert!(mail.html.contains("New hoodies<br>"));
        assert!(!mail.html.contains("<now>"));
        assert!(mail.html.contains("in stock &#60;now&#62;"));
    }
}
