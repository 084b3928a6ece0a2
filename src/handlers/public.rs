//! Public content reads: list and get-by-slug for every content kind.

use crate::content::Content;
use crate::error::AppError;
use crate::response::{success_one_ok, success_page};
use crate::service::{catalog, ListParams};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use std::collections::HashMap;

/// GET /api/public/{kind}?limit&offset&category&featured&in_stock
pub async fn list<T: Content>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let db = state.datastores()?;
    let params = ListParams::from_query(&params);
    let listing = catalog::list::<T>(db, &state.media, &params).await?;
    Ok(success_page(listing.items, listing.total, listing.limit, listing.offset))
}

/// GET /api/public/{kind}/:slug (slug first, then raw id)
pub async fn read<T: Content>(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let db = state.datastores()?;
    let item = catalog::get::<T>(db, &state.media, slug.trim()).await?;
    Ok(success_one_ok(item))
}
