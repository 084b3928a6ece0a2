//! Contact, quote, support and project inquiries.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::response::success_one_created;
use crate::service::InquiryRequest;
use crate::state::AppState;
use crate::store::into_row;
use axum::extract::State;
use serde_json::{json, Value};

pub const INQUIRIES_TABLE: &str = "inquiries";

/// POST /api/inquiries
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let req = InquiryRequest::parse(body)?;
    let db = state.datastores()?;
    let priority = req.inquiry_type.priority();
    let row = into_row(json!({
        "name": req.name,
        "email": req.email,
        "phone": req.phone,
        "subject": req.subject,
        "message": req.message,
        "type": req.inquiry_type.as_str(),
        "priority": priority.as_str(),
        "status": "new",
    }));
    let mut stored = db.admin.insert(INQUIRIES_TABLE, &row).await?;
    stored.insert("priority".into(), Value::String(priority.as_str().into()));
    tracing::info!(inquiry_type = req.inquiry_type.as_str(), priority = priority.as_str(), "inquiry received");
    Ok(success_one_created(
        Value::Object(stored),
        "Thank you for your inquiry. We will get back to you shortly.",
    ))
}
