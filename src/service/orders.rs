//! Orders are stored as quote inquiries; the order lives in the message body.
//!
//! The encoding is lossy on the way back: only the order number and product name
//! are recovered, quantity reads as 1 and the total as 0.

use super::validation::{OrderRequest, DEFAULT_CURRENCY};
use crate::store::{value_text, Row};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static ORDER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Order Number: (ORD-\d+)").expect("static regex"));
static PRODUCT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Product: (.+?)(?: \([^()]*\))?\s*$").expect("static regex"));

/// `ORD-<epoch millis>`. Two orders in the same millisecond share a number.
pub fn order_number(epoch_millis: i64) -> String {
    format!("ORD-{}", epoch_millis)
}

/// Line-oriented message body stored on the inquiry.
pub fn order_message(number: &str, order: &OrderRequest) -> String {
    let product = match &order.product_id {
        Some(id) => format!("{} ({})", order.product_name, id),
        None => order.product_name.clone(),
    };
    let mut lines = vec![
        format!("Order Number: {}", number),
        format!("Product: {}", product),
        format!("Quantity: {}", order.quantity),
        format!("Unit Price: {} {:.2}", order.currency, order.unit_price),
        format!("Total Price: {} {:.2}", order.currency, order.total_price),
    ];
    if let Some(phone) = &order.phone {
        lines.push(format!("Phone: {}", phone));
    }
    if let Some(address) = &order.delivery_address {
        lines.push(format!("Delivery Address: {}", address));
    }
    if let Some(notes) = &order.notes {
        lines.push(format!("Notes: {}", notes));
    }
    lines.join("\n")
}

pub fn order_subject(number: &str, order: &OrderRequest) -> String {
    format!("Order {} - {}", number, order.product_name)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
}

impl OrderStatus {
    /// Inquiry workflow status to the customer-facing order status.
    pub fn from_inquiry_status(status: Option<&str>) -> Self {
        match status {
            Some("completed") => OrderStatus::Completed,
            Some("in_progress") => OrderStatus::Processing,
            _ => OrderStatus::Pending,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderView {
    pub id: String,
    pub order_number: String,
    pub product_name: Option<String>,
    pub quantity: u32,
    pub total_price: f64,
    pub currency: String,
    pub status: OrderStatus,
    pub created_at: Option<String>,
}

impl OrderView {
    pub fn from_inquiry(row: &Row) -> Self {
        let id = row.get("id").and_then(value_text).unwrap_or_default();
        let message = row.get("message").and_then(value_text).unwrap_or_default();
        let order_number = ORDER_NUMBER
            .captures(&message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| format!("ORD-{}", id));
        let product_name = PRODUCT_LINE
            .captures(&message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string());
        let status = row.get("status").and_then(value_text);
        OrderView {
            order_number,
            product_name,
            quantity: 1,
            total_price: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
            status: OrderStatus::from_inquiry_status(status.as_deref()),
            created_at: row.get("created_at").and_then(value_text),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::into_row as row;
    use serde_json::json;

    fn order() -> OrderRequest {
        OrderRequest {
            customer_name: "Otieno".into(),
            email: "otieno@studio.test".into(),
            phone: Some("+254700000000".into()),
            product_id: Some("p-17".into()),
            product_name: "Marble Tile".into(),
            quantity: 12,
            unit_price: 2500.0,
            total_price: 30000.0,
            currency: "KES".into(),
            delivery_address: None,
            notes: Some("Deliver after 5pm".into()),
        }
    }

    #[test]
    fn order_number_format() {
        let n = order_number(1_717_171_717_171);
        assert_eq!(n, "ORD-1717171717171");
        assert!(Regex::new(r"^ORD-\d+$").unwrap().is_match(&n));
    }

    #[test]
    fn message_template() {
        let msg = order_message("ORD-1", &order());
        assert_eq!(
            msg,
            "Order Number: ORD-1\nProduct: Marble Tile (p-17)\nQuantity: 12\nUnit Price: KES 2500.00\n\
             Total Price: KES 30000.00\nPhone: +254700000000\nNotes: Deliver after 5pm"
        );
    }

    #[test]
    fn read_back_is_lossy() {
        let msg = order_message("ORD-1717171717171", &order());
        let view = OrderView::from_inquiry(&row(json!({
            "id": 9, "message": msg, "status": "in_progress", "created_at": "2024-05-01T10:00:00Z"
        })));
        assert_eq!(view.order_number, "ORD-1717171717171");
        assert_eq!(view.product_name.as_deref(), Some("Marble Tile"));
        assert_eq!(view.status, OrderStatus::Processing);
        assert_eq!(view.quantity, 1);
        assert_eq!(view.total_price, 0.0);
    }

    #[test]
    fn free_text_quote_falls_back_to_inquiry_id() {
        let view = OrderView::from_inquiry(&row(json!({"id": 44, "message": "Please quote 40 sqm", "status": "new"})));
        assert_eq!(view.order_number, "ORD-44");
        assert_eq!(view.product_name, None);
        assert_eq!(view.status, OrderStatus::Pending);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(OrderStatus::from_inquiry_status(Some("completed")), OrderStatus::Completed);
        assert_eq!(OrderStatus::from_inquiry_status(Some("in_progress")), OrderStatus::Processing);
        assert_eq!(OrderStatus::from_inquiry_status(Some("new")), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_inquiry_status(None), OrderStatus::Pending);
    }
}
