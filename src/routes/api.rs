//! JSON API under /api: public content, search and form submissions.

use crate::content::{BlogPost, Product, Project, Service};
use crate::handlers::{inquiries, newsletter, orders, public, search};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/public/products", get(public::list::<Product>))
        .route("/api/public/products/:slug", get(public::read::<Product>))
        .route("/api/public/projects", get(public::list::<Project>))
        .route("/api/public/projects/:slug", get(public::read::<Project>))
        .route("/api/public/blog", get(public::list::<BlogPost>))
        .route("/api/public/blog/:slug", get(public::read::<BlogPost>))
        .route("/api/public/services", get(public::list::<Service>))
        .route("/api/public/services/:slug", get(public::read::<Service>))
        .route("/api/search", get(search::search))
        .route("/api/inquiries", post(inquiries::create))
        .route("/api/orders", post(orders::create).get(orders::list_by_email))
        .route("/api/newsletter", post(newsletter::subscribe))
        .with_state(state)
}
