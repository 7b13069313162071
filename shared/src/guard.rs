use crate::Role;

/// Outcome of a role check. Carries no reason: denial is always "forbidden".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Role guard: `role ∈ allowed`. An empty set allows nobody.
pub fn authorize(role: Role, allowed: &[Role]) -> Decision {
    let permitted = allowed.iter().any(|candidate| match (candidate, role) {
        (Role::User, Role::User) | (Role::Admin, Role::Admin) => true,
        (Role::User, Role::Admin) | (Role::Admin, Role::User) => false,
    });
    if permitted {
        Decision::Allow
    } else {
        Decision::Deny
    }
}
