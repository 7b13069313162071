use std::sync::Arc;

use axum::{extract::State, routing, Router};
use serde::Deserialize;
use shared::{Identity, Role};
use tracing::info;

use super::extract::{JsonBody, PathParam};
use crate::auth::AdminUser;
use crate::models::{AppError, AppState, CustomResponse, User};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", routing::get(read_all))
        .route("/{id}/role", routing::patch(update_role))
}

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

async fn read_all(
    _admin: AdminUser,
    State(app_state): State<Arc<AppState>>,
) -> Result<CustomResponse<Vec<Identity>>, AppError> {
    let users = User::read_all(&app_state.pool)
        .await?
        .iter()
        .map(User::identity)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CustomResponse::ok("Users", users))
}

/// Already issued tokens keep the old role until they expire.
async fn update_role(
    admin: AdminUser,
    State(app_state): State<Arc<AppState>>,
    PathParam(id): PathParam<i64>,
    JsonBody(change): JsonBody<RoleChange>,
) -> Result<CustomResponse<Identity>, AppError> {
    let user = User::update_role(&app_state.pool, id, change.role)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    info!(
        "Admin {} set role of user {} to {}",
        admin.identity.id, id, change.role
    );
    Ok(CustomResponse::ok("Role updated", user.identity()?))
}
