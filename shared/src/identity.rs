use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Role;

/// Subject resolved from a verified session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "Identity.ts")]
pub struct Identity {
    /// Subject identifier (the user's primary key).
    #[ts(type = "number")]
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: i64, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
