//! Newsletter signup. Idempotent per normalized email; the unique constraint settles races.

use crate::error::{AppError, StoreError};
use crate::extractors::JsonBody;
use crate::response::ack;
use crate::service::NewsletterRequest;
use crate::state::AppState;
use crate::store::{into_row, loose_bool, Filter, Select};
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;

pub const SUBSCRIBERS_TABLE: &str = "newsletter_subscribers";

const ALREADY_SUBSCRIBED: &str = "You are already subscribed to our newsletter.";

/// POST /api/newsletter
pub async fn subscribe(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let req = NewsletterRequest::parse(body)?;
    let db = state.datastores()?;
    let by_email = Filter::eq_ignore_case("email", &req.email);
    let existing = db
        .admin
        .select(&Select::from(SUBSCRIBERS_TABLE).filter(by_email.clone()).limit(1))
        .await?;
    if let Some(row) = existing.rows.first() {
        if row.get("active").and_then(loose_bool).unwrap_or(true) {
            return Ok(ack(StatusCode::OK, ALREADY_SUBSCRIBED));
        }
        db.admin
            .update(SUBSCRIBERS_TABLE, &[by_email], &into_row(json!({ "active": true })))
            .await?;
        tracing::info!("newsletter subscription reactivated");
        return Ok(ack(StatusCode::OK, "Welcome back! Your subscription has been reactivated."));
    }
    let row = into_row(json!({ "email": req.email, "active": true }));
    match db.admin.insert(SUBSCRIBERS_TABLE, &row).await {
        Ok(_) => {
            tracing::info!("newsletter subscription created");
            Ok(ack(StatusCode::CREATED, "Thank you for subscribing to our newsletter!"))
        }
        Err(StoreError::UniqueViolation(_)) => Ok(ack(StatusCode::OK, ALREADY_SUBSCRIBED)),
        Err(e) => Err(e.into()),
    }
}
