use std::sync::{Arc, OnceLock};

use axum::{extract::State, routing, Router};
use serde::Serialize;
use shared::{Identity, Role};
use tracing::{debug, info, warn};

use super::extract::JsonBody;
use crate::auth::{issue_token, CurrentUser};
use crate::models::{AppError, AppState, Credentials, CustomResponse, NewUser, User};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", routing::post(login))
        .route("/register", routing::post(register))
        .route("/me", routing::get(me))
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
}

pub async fn login(
    State(app_state): State<Arc<AppState>>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<CustomResponse<LoginResponse>, AppError> {
    let email = credentials.normalized_email();
    info!("Login attempt for {}", email);

    let Some(user) = User::read_by_email(&app_state.pool, &email).await? else {
        // Unknown emails still pay for one bcrypt verification.
        let _ = bcrypt::verify(&credentials.password, placeholder_hash(app_state.bcrypt_cost));
        warn!("Login failed: unknown email {}", email);
        return Err(AppError::InvalidCredentials);
    };
    if !bcrypt::verify(&credentials.password, &user.password_hash)? {
        warn!("Login failed: wrong password for {}", email);
        return Err(AppError::InvalidCredentials);
    }

    let identity = user.identity()?;
    let token = issue_token(&identity, &app_state.tokens, chrono::Utc::now())?;
    Ok(CustomResponse::ok(
        "Logged in",
        LoginResponse {
            token,
            user: identity,
        },
    ))
}

/// A hash no password is expected to match, computed once at the configured cost.
fn placeholder_hash(cost: u32) -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| bcrypt::hash("storefront-unknown-account", cost).unwrap_or_default())
}

/// Self-registration always yields a `user` account.
pub async fn register(
    State(app_state): State<Arc<AppState>>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<CustomResponse<Identity>, AppError> {
    credentials.validate()?;
    let email = credentials.normalized_email();
    if User::read_by_email(&app_state.pool, &email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "An account already exists for {}",
            email
        )));
    }

    let password_hash = bcrypt::hash(&credentials.password, app_state.bcrypt_cost)?;
    let user = User::create(
        &app_state.pool,
        NewUser {
            email,
            password_hash,
            role: Role::User,
        },
    )
    .await?;
    debug!("User created: {} ({})", user.id, user.email);
    Ok(CustomResponse::created("User created", user.identity()?))
}

pub async fn me(CurrentUser(identity): CurrentUser) -> CustomResponse<Identity> {
    CustomResponse::ok("Current user", identity)
}
