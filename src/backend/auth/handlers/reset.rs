/**
 * Password Reset Handlers
 *
 * Two-step reset flow:
 *
 * 1. `POST /api/auth/request-reset` stores a random token on the user with a
 *    one hour expiry and mails a link to `{FRONTEND_URL}/reset-password?token=...`
 * 2. `POST /api/auth/reset-password` exchanges a valid token for a new
 *    password and clears the token
 */

use axum::{extract::State, response::Json};
use chrono::Utc;

use crate::backend::auth::handlers::types::{MessageResponse, RequestResetRequest, ResetPasswordRequest};
use crate::backend::auth::users::{
    generate_reset_token, hash_password, normalize_email, reset_token_expiry, User, MIN_PASSWORD_LEN,
};
use crate::backend::error::BackendError;
use crate::backend::notify::templates;
use crate::backend::server::state::AppState;

/// Request reset handler
///
/// # Errors
///
/// * `400 Bad Request` - email missing
/// * `404 Not Found` - no user with that email
/// * `500 Internal Server Error` - the reset mail could not be sent
pub async fn request_reset(
    State(state): State<AppState>,
    Json(request): Json<RequestResetRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    if request.email.trim().is_empty() {
        return Err(BackendError::validation("email", "Email is required"));
    }

    let email = normalize_email(&request.email);
    let user = state
        .users
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| BackendError::not_found("No user found with that email"))?;

    let now = Utc::now();
    let token = generate_reset_token();
    let user = User {
        reset_token: Some(token.clone()),
        reset_expires_at: Some(reset_token_expiry(now)),
        updated_at: now,
        ..user
    };
    state.users.update_user(&user).await?;

    let mail = templates::password_reset(&user.email, &state.config.frontend_url, &token);
    state.notifier.send(mail).await.map_err(|e| {
        tracing::error!("[Auth] Reset mail to {} failed: {}", user.email, e);
        BackendError::delivery("Failed to send password reset email")
    })?;

    tracing::info!("[Auth] Password reset requested for {}", user.id);
    Ok(Json(MessageResponse::new("Password reset email sent")))
}

/// Reset password handler
///
/// # Errors
///
/// * `400 Bad Request` - missing fields, unknown or expired token, short password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    if request.token.trim().is_empty() || request.password.is_empty() {
        return Err(BackendError::validation(
            "body",
            "Token and new password are required",
        ));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BackendError::validation(
            "password",
            format!("Password must be at least {} characters long", MIN_PASSWORD_LEN),
        ));
    }

    let now = Utc::now();
    let token = request.token.trim();
    let user = state
        .users
        .find_user_by_reset_token(token)
        .await?
        .filter(|u| u.reset_token_valid(token, now))
        .ok_or_else(|| BackendError::validation("token", "Invalid or expired token"))?;

    let user = User {
        password_hash: Some(hash_password(&request.password, state.config.bcrypt_cost)?),
        reset_token: None,
        reset_expires_at: None,
        updated_at: now,
        ..user
    };
    state.users.update_user(&user).await?;

    tracing::info!("[Auth] Password reset for {}", user.id);
    Ok(Json(MessageResponse::new("Password has been reset")))
}
