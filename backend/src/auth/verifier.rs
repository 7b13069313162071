use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use shared::Identity;

use super::TokenSettings;
use crate::models::TokenClaims;

/// Why a token was refused. Every variant surfaces as 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

/// Check signature and expiry and return the identity the token was issued for.
pub fn verify_token(token: &str, settings: &TokenSettings) -> Result<Identity, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(settings.secret()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    data.claims.identity().ok_or(AuthError::Malformed)
}
