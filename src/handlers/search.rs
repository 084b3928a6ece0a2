//! Site-wide search.

use crate::error::AppError;
use crate::service::search::{self, clamp_limit, SearchResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
pub struct SearchBody {
    pub success: bool,
    pub data: Vec<SearchResult>,
    pub total: usize,
    pub query: String,
}

/// GET /api/search?q&limit. A blank query returns no results.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SearchBody>, AppError> {
    let query = params.get("q").map(|q| q.trim().to_string()).unwrap_or_default();
    if query.is_empty() {
        return Ok(Json(SearchBody {
            success: true,
            data: Vec::new(),
            total: 0,
            query,
        }));
    }
    let limit = clamp_limit(params.get("limit").and_then(|l| l.trim().parse().ok()));
    let db = state.datastores()?;
    let data = search::search(db, &state.media, &query, limit).await;
    Ok(Json(SearchBody {
        success: true,
        total: data.len(),
        data,
        query,
    }))
}
