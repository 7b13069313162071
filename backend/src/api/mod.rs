mod auth;
mod extract;
mod health;
mod orders;
mod products;
mod users;

use std::sync::Arc;

use axum::{http::Uri, Router};

use crate::models::{AppError, AppState};

pub use auth::LoginResponse;
pub use extract::{JsonBody, PathParam, QueryParams};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health::router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
}

pub async fn fallback_404(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
