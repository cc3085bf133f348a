/**
 * Authentication Middleware
 *
 * This module resolves a request's bearer credential into an identity.
 * `AuthGate::resolve` is the single place this happens: the HTTP middleware
 * uses it for protected routes and the realtime endpoint uses it before
 * upgrading a connection.
 *
 * A credential is rejected when it is missing, malformed, fails signature or
 * expiry checks, or names a user that no longer exists.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::error::BackendError;
use crate::backend::store::UserStore;
use crate::shared::UserId;

/// Identity resolved from a credential
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Resolves credentials into identities
#[derive(Clone)]
pub struct AuthGate {
    keys: SessionKeys,
    users: Arc<dyn UserStore>,
}

impl AuthGate {
    pub fn new(keys: SessionKeys, users: Arc<dyn UserStore>) -> Self {
        Self { keys, users }
    }

    /// Signing keys, for issuing tokens at login
    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Resolve a bearer token into an existing identity
    pub async fn resolve(&self, credential: Option<&str>) -> Result<AuthenticatedUser, BackendError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::debug!("[Auth] Missing credential");
                BackendError::Unauthenticated
            })?;

        let user_id = self
            .keys
            .user_id_from_token(token)
            .ok_or(BackendError::Unauthenticated)?;

        let user = self.users.find_user_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!("[Auth] Token for unknown user {}", user_id);
            BackendError::Unauthenticated
        })?;

        Ok(AuthenticatedUser {
            user_id: user.id,
            email: user.email,
        })
    }
}

/// The token of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Authentication middleware
///
/// Resolves the bearer token and attaches the identity to the request
/// extensions. Returns 401 if the token is missing or invalid.
pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let user = gate.resolve(bearer_token(request.headers())).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user set by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                BackendError::Unauthenticated
            })?;
        Ok(AuthUser(user))
    }
}
