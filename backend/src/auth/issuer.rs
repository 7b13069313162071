use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use shared::Identity;
use tracing::debug;

use super::TokenSettings;
use crate::models::{AppError, TokenClaims};

/// Mint an HS256 token for an identity that has already been authenticated.
/// `exp` is `now + ttl`; nothing is stored.
pub fn issue_token(
    identity: &Identity,
    settings: &TokenSettings,
    now: DateTime<Utc>,
) -> Result<String, AppError> {
    let iat = now.timestamp();
    let exp = now
        .checked_add_signed(settings.ttl())
        .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".to_string()))?
        .timestamp();
    let claims = TokenClaims::for_identity(identity, iat, exp);

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Encoding JWT error: {}", e)))?;
    debug!("Issued token for user {} ({})", identity.id, identity.role);
    Ok(token)
}
