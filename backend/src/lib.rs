//! Storefront API: users, products and orders behind bearer-token auth.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod system;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::models::AppState;

/// Full application router, everything under `/api`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api::router())
        .fallback(api::fallback_404)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
