//! Crawler files served at the site root.

use crate::handlers::seo::{robots, sitemap};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn seo_routes(state: AppState) -> Router {
    Router::new()
        .route("/robots.txt", get(robots))
        .route("/sitemap.xml", get(sitemap))
        .with_state(state)
}
