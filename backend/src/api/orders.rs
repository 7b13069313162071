use std::sync::Arc;

use axum::{extract::State, routing, Router};
use tracing::info;

use super::extract::{JsonBody, PathParam};
use crate::auth::AnyUser;
use crate::models::{AppError, AppState, CustomResponse, NewOrder, Order};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", routing::get(read_orders).post(create_order))
        .route("/{id}", routing::get(read_order))
}

/// The owner is the caller, whatever the body says.
async fn create_order(
    caller: AnyUser,
    State(app_state): State<Arc<AppState>>,
    JsonBody(new_order): JsonBody<NewOrder>,
) -> Result<CustomResponse<Order>, AppError> {
    let order = Order::create(&app_state.pool, caller.identity.id, new_order).await?;
    info!("User {} placed order {}", caller.identity.id, order.id);
    Ok(CustomResponse::created("Order created", order))
}

/// Admins see every order, users their own.
async fn read_orders(
    caller: AnyUser,
    State(app_state): State<Arc<AppState>>,
) -> Result<CustomResponse<Vec<Order>>, AppError> {
    let orders = if caller.identity.is_admin() {
        Order::read_all(&app_state.pool).await?
    } else {
        Order::read_by_user(&app_state.pool, caller.identity.id).await?
    };
    Ok(CustomResponse::ok("Orders", orders))
}

async fn read_order(
    caller: AnyUser,
    State(app_state): State<Arc<AppState>>,
    PathParam(id): PathParam<i64>,
) -> Result<CustomResponse<Order>, AppError> {
    let order = Order::read_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    if order.user != caller.identity.id && !caller.identity.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(CustomResponse::ok("Order", order))
}
