/**
 * Login Handler
 *
 * This module implements the authentication handler for POST /api/auth/login.
 *
 * Unknown emails, placeholder identities and wrong passwords all produce the
 * same 401 so that registered emails cannot be discovered.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::users::{normalize_email, verify_password};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - email or password missing
/// * `401 Unauthorized` - invalid email or password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(BackendError::validation("body", "Email and password are required"));
    }

    let email = normalize_email(&request.email);
    let user = state.users.find_user_by_email(&email).await?.ok_or_else(|| {
        tracing::warn!("[Auth] Login for unknown email: {}", email);
        BackendError::InvalidCredentials
    })?;

    if !verify_password(&request.password, &user)? {
        tracing::warn!("[Auth] Invalid password for {}", email);
        return Err(BackendError::InvalidCredentials);
    }

    let response = AuthResponse::issue(state.auth.keys(), &user)?;
    tracing::info!("[Auth] User logged in: {} ({})", user.id, user.email);
    Ok(Json(response))
}
