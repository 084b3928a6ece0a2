//! Checkout orders, persisted as high-priority quote inquiries.

use super::inquiries::INQUIRIES_TABLE;
use crate::error::{AppError, FieldError};
use crate::extractors::JsonBody;
use crate::response::{success_one_created, success_one_ok};
use crate::service::orders::{order_message, order_number, order_subject, OrderStatus, OrderView};
use crate::service::validation::is_valid_email;
use crate::service::OrderRequest;
use crate::state::AppState;
use crate::store::{into_row, value_text, Filter, Select};
use axum::extract::{Query, State};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

/// Most recent orders returned per lookup.
pub const MAX_ORDERS: u32 = 100;

#[derive(Serialize)]
pub struct OrderCreated {
    pub order_number: String,
    pub inquiry_id: Option<String>,
    pub status: OrderStatus,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    pub currency: String,
    pub created_at: Option<String>,
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let db = state.datastores()?;
    let order = OrderRequest::parse(body)?;
    let number = order_number(chrono::Utc::now().timestamp_millis());
    let row = into_row(json!({
        "name": order.customer_name,
        "email": order.email,
        "phone": order.phone,
        "subject": order_subject(&number, &order),
        "message": order_message(&number, &order),
        "type": "quote",
        "priority": "high",
        "status": "new",
    }));
    let stored = db.admin.insert(INQUIRIES_TABLE, &row).await?;
    tracing::info!(order_number = %number, quantity = order.quantity, "order received");
    Ok(success_one_created(
        OrderCreated {
            inquiry_id: stored.get("id").and_then(value_text),
            created_at: stored.get("created_at").and_then(value_text),
            order_number: number,
            status: OrderStatus::Pending,
            product_name: order.product_name,
            quantity: order.quantity,
            unit_price: order.unit_price,
            total_price: order.total_price,
            currency: order.currency,
        },
        "Order placed successfully. We will contact you to confirm delivery.",
    ))
}

/// GET /api/orders?email=, newest first.
pub async fn list_by_email(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let email = params
        .get("email")
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("email query parameter is required".into()))?;
    if !is_valid_email(email) {
        return Err(AppError::Validation(vec![FieldError::new("email", "Invalid email address")]));
    }
    let db = state.datastores()?;
    let query = Select::from(INQUIRIES_TABLE)
        .filter(Filter::eq("type", "quote"))
        .filter(Filter::eq_ignore_case("email", email))
        .order_desc("created_at")
        .limit(MAX_ORDERS);
    let rows = db.admin.select(&query).await?;
    let orders: Vec<OrderView> = rows.rows.iter().map(OrderView::from_inquiry).collect();
    Ok(success_one_ok(orders))
}
