//! Navigation gating. Mirrors the server's role guard using only the cached
//! session, so the UI never sends a user to a page whose calls would be
//! refused. The server remains the authority.

use shared::{authorize, Role};

use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Proceed,
    RedirectToLogin,
    RedirectToHome,
}

impl RouteDecision {
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            RouteDecision::Proceed => None,
            RouteDecision::RedirectToLogin => Some(LOGIN_PATH),
            RouteDecision::RedirectToHome => Some(HOME_PATH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// Login required; a non-empty set further restricts by role.
    Protected(&'static [Role]),
}

const SIGNED_IN: &[Role] = &[Role::User, Role::Admin];
const ADMIN: &[Role] = &[Role::Admin];

const ROUTES: &[(&str, RouteAccess)] = &[
    ("/", RouteAccess::Public),
    ("/products/{id}", RouteAccess::Public),
    ("/login", RouteAccess::Public),
    ("/register", RouteAccess::Public),
    ("/cart", RouteAccess::Protected(SIGNED_IN)),
    ("/orders", RouteAccess::Protected(SIGNED_IN)),
    ("/admin/dashboard", RouteAccess::Protected(ADMIN)),
    ("/admin/products", RouteAccess::Protected(ADMIN)),
    ("/admin/users", RouteAccess::Protected(ADMIN)),
];

/// Decide a protected navigation from the session alone.
pub fn guard(session: &Session, allowed: &[Role]) -> RouteDecision {
    if !session.is_logged_in() {
        return RouteDecision::RedirectToLogin;
    }
    if allowed.is_empty() {
        return RouteDecision::Proceed;
    }
    match &session.user {
        Some(user) if authorize(user.role, allowed).is_allowed() => RouteDecision::Proceed,
        _ => RouteDecision::RedirectToHome,
    }
}

fn matches(pattern: &str, path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    let mut expected = pattern.split('/');
    let mut actual = path.split('/');
    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return true,
            (Some(p), Some(a)) if p.starts_with('{') && p.ends_with('}') && !a.is_empty() => {}
            (Some(p), Some(a)) if p == a => {}
            _ => return false,
        }
    }
}

/// Access rule of a known page, `None` for paths the app does not define.
pub fn route_access(path: &str) -> Option<RouteAccess> {
    ROUTES
        .iter()
        .find(|(pattern, _)| matches(pattern, path))
        .map(|(_, access)| *access)
}

/// Guard a navigation to `path`. Unknown pages are left to the not-found view.
pub fn navigate(session: &Session, path: &str) -> RouteDecision {
    match route_access(path) {
        Some(RouteAccess::Protected(allowed)) => guard(session, allowed),
        Some(RouteAccess::Public) | None => RouteDecision::Proceed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Identity;

    fn signed_in(role: Role) -> Session {
        Session {
            token: Some("tok".into()),
            user: Some(Identity::new(1, "someone@example.com", role)),
        }
    }

    #[test]
    fn anonymous_goes_to_login() {
        let session = Session::default();
        assert_eq!(guard(&session, ADMIN), RouteDecision::RedirectToLogin);
        assert_eq!(guard(&session, SIGNED_IN), RouteDecision::RedirectToLogin);
        assert_eq!(guard(&session, &[]), RouteDecision::RedirectToLogin);
    }

    #[test]
    fn user_on_admin_page_goes_home() {
        assert_eq!(guard(&signed_in(Role::User), ADMIN), RouteDecision::RedirectToHome);
        assert_eq!(guard(&signed_in(Role::User), SIGNED_IN), RouteDecision::Proceed);
    }

    #[test]
    fn admin_proceeds() {
        assert_eq!(guard(&signed_in(Role::Admin), ADMIN), RouteDecision::Proceed);
        assert_eq!(guard(&signed_in(Role::Admin), SIGNED_IN), RouteDecision::Proceed);
    }

    #[test]
    fn empty_role_set_only_needs_login() {
        assert_eq!(guard(&signed_in(Role::User), &[]), RouteDecision::Proceed);
    }

    #[test]
    fn token_without_user_is_not_trusted_for_roles() {
        let session = Session {
            token: Some("tok".into()),
            user: None,
        };
        assert_eq!(guard(&session, SIGNED_IN), RouteDecision::RedirectToHome);
    }

    #[test]
    fn agrees_with_server_guard() {
        for role in Role::ALL {
            for allowed in [ADMIN, SIGNED_IN, &[Role::User][..]] {
                let server = authorize(role, allowed).is_allowed();
                let client = guard(&signed_in(role), allowed) == RouteDecision::Proceed;
                assert_eq!(server, client, "{role} on {allowed:?}");
            }
        }
    }

    #[test]
    fn route_table() {
        assert_eq!(route_access("/"), Some(RouteAccess::Public));
        assert_eq!(route_access("/products/42"), Some(RouteAccess::Public));
        assert_eq!(route_access("/products/"), None);
        assert_eq!(route_access("/cart?step=2"), Some(RouteAccess::Protected(SIGNED_IN)));
        assert_eq!(route_access("/admin/users/"), Some(RouteAccess::Protected(ADMIN)));
        assert_eq!(route_access("/admin"), None);
    }

    #[test]
    fn navigation() {
        let anonymous = Session::default();
        assert_eq!(navigate(&anonymous, "/"), RouteDecision::Proceed);
        assert_eq!(navigate(&anonymous, "/orders"), RouteDecision::RedirectToLogin);
        assert_eq!(
            navigate(&signed_in(Role::User), "/admin/dashboard"),
            RouteDecision::RedirectToHome
        );
        assert_eq!(
            navigate(&signed_in(Role::Admin), "/admin/products"),
            RouteDecision::Proceed
        );
        assert_eq!(navigate(&anonymous, "/nowhere"), RouteDecision::Proceed);
        assert_eq!(RouteDecision::RedirectToHome.redirect_target(), Some("/"));
        assert_eq!(RouteDecision::Proceed.redirect_target(), None);
    }
}
