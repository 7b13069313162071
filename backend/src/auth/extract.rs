use std::{marker::PhantomData, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use shared::{authorize, Decision, Identity, Role};
use tracing::debug;

use super::{verify_token, AuthError};
use crate::models::{AppError, AppState};

/// Identity resolved from the `Authorization: Bearer` header.
///
/// Rejects with 401 before the handler (or its body extractor) runs. The
/// identity is cached in the request extensions for later extractors.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(CurrentUser(identity.clone()));
        }

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| {
                if rejection.is_missing() {
                    AuthError::MissingToken
                } else {
                    AuthError::Malformed
                }
            })?;

        let identity = verify_token(bearer.token(), &state.tokens)?;
        parts.extensions.insert(identity.clone());
        Ok(CurrentUser(identity))
    }
}

/// Set of roles a route accepts.
pub trait RolePolicy {
    const ALLOWED: &'static [Role];
}

#[derive(Debug, Clone, Copy)]
pub struct AnyRole;

impl RolePolicy for AnyRole {
    const ALLOWED: &'static [Role] = &[Role::User, Role::Admin];
}

#[derive(Debug, Clone, Copy)]
pub struct AdminOnly;

impl RolePolicy for AdminOnly {
    const ALLOWED: &'static [Role] = &[Role::Admin];
}

/// Verified identity whose role passed the policy `P`.
///
/// Missing or bad token → 401, role outside `P::ALLOWED` → 403.
#[derive(Debug, Clone)]
pub struct Authorized<P> {
    pub identity: Identity,
    policy: PhantomData<P>,
}

pub type AnyUser = Authorized<AnyRole>;
pub type AdminUser = Authorized<AdminOnly>;

impl<P> Authorized<P> {
    pub fn into_inner(self) -> Identity {
        self.identity
    }
}

impl<P> FromRequestParts<Arc<AppState>> for Authorized<P>
where
    P: RolePolicy + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;
        match authorize(identity.role, P::ALLOWED) {
            Decision::Allow => Ok(Authorized {
                identity,
                policy: PhantomData,
            }),
            Decision::Deny => {
                debug!(
                    "User {} with role {} denied on {} {}",
                    identity.id, identity.role, parts.method, parts.uri
                );
                Err(AppError::Forbidden)
            }
        }
    }
}
