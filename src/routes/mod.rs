//! Route assembly.

mod api;
mod common;
mod seo;

pub use api::api_routes;
pub use common::common_routes;
pub use seo::seo_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application router with request tracing and the body size cap.
pub fn app(state: AppState) -> Router {
    let max_body_bytes = state.settings.max_body_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(seo_routes(state.clone()))
        .merge(api_routes(state))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
}
