use serde::{Deserialize, Serialize};
use shared::{Identity, Role};

/// JWT payload. `sub` carries the user id as a string, timestamps are seconds since epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn for_identity(identity: &Identity, iat: i64, exp: i64) -> Self {
        Self {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            role: identity.role,
            iat,
            exp,
        }
    }

    /// Subject as a user id; `None` when the token carries something else.
    pub fn identity(&self) -> Option<Identity> {
        let id = self.sub.parse::<i64>().ok()?;
        Some(Identity::new(id, self.email.clone(), self.role))
    }
}
