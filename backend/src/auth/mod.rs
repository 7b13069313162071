//! Session tokens and access control.
//!
//! [`issue_token`] mints a signed token for an authenticated identity,
//! [`verify_token`] turns a bearer token back into an [`Identity`], and the
//! extractors in [`extract`] enforce both at the HTTP boundary so handlers
//! only ever see a verified identity.
//!
//! [`Identity`]: shared::Identity

mod extract;
mod issuer;
mod verifier;

pub use extract::{AdminOnly, AdminUser, AnyRole, AnyUser, Authorized, CurrentUser, RolePolicy};
pub use issuer::issue_token;
pub use verifier::{verify_token, AuthError};

use std::fmt;

/// Signing secret and expiry policy shared by the issuer and the verifier.
#[derive(Clone)]
pub struct TokenSettings {
    secret: String,
    ttl: chrono::Duration,
}

impl TokenSettings {
    pub const DEFAULT_TTL_MINUTES: i64 = 60;
    /// Thirty days.
    pub const MAX_TTL_MINUTES: i64 = 30 * 24 * 60;

    pub fn new(secret: impl Into<String>, ttl: chrono::Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn with_default_ttl(secret: impl Into<String>) -> Self {
        Self::new(secret, chrono::Duration::minutes(Self::DEFAULT_TTL_MINUTES))
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}
