/**
 * Register Handler
 *
 * This module implements the registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate email shape, password length and name length
 * 2. Hash the password with bcrypt
 * 3. Create the user, or claim the placeholder created by an earlier invite
 * 4. Send a welcome mail in the background (failure is logged, not returned)
 * 5. Return a token and the public user
 *
 * # Validation
 *
 * - All of email, password and name are required
 * - Email must have the `local@domain.tld` shape
 * - Password must be at least 6 characters long
 * - Trimmed name must be at least 2 characters long
 */

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::users::{hash_password, normalize_email, User, MIN_NAME_LEN, MIN_PASSWORD_LEN};
use crate::backend::error::BackendError;
use crate::backend::notify::templates;
use crate::backend::server::state::AppState;
use crate::shared::error::validate_email;

fn validate_registration(request: &RegisterRequest) -> Result<(), BackendError> {
    if request.email.trim().is_empty() || request.password.is_empty() || request.name.trim().is_empty() {
        return Err(BackendError::validation(
            "body",
            "All fields (email, password, name) are required",
        ));
    }
    validate_email(request.email.trim())?;
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BackendError::validation(
            "password",
            format!("Password must be at least {} characters long", MIN_PASSWORD_LEN),
        ));
    }
    if request.name.trim().chars().count() < MIN_NAME_LEN {
        return Err(BackendError::validation(
            "name",
            format!("Name must be at least {} characters long", MIN_NAME_LEN),
        ));
    }
    Ok(())
}

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid or missing fields
/// * `409 Conflict` - email already registered
/// * `500 Internal Server Error` - hashing, store or token failure
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    validate_registration(&request)?;

    let email = normalize_email(&request.email);
    let name = request.name.trim().to_string();
    tracing::info!("[Auth] Register request for {}", email);

    let password_hash = hash_password(&request.password, state.config.bcrypt_cost)?;

    let user = match state.users.find_user_by_email(&email).await? {
        Some(existing) if existing.is_placeholder() => {
            let claimed = User {
                name,
                password_hash: Some(password_hash),
                updated_at: Utc::now(),
                ..existing
            };
            state.users.update_user(&claimed).await?;
            tracing::info!("[Auth] {} claimed placeholder {}", claimed.email, claimed.id);
            claimed
        }
        Some(_) => {
            tracing::warn!("[Auth] Email already registered: {}", email);
            return Err(BackendError::conflict("Email already registered"));
        }
        None => {
            state
                .users
                .create_user(User::registered(email, name, password_hash))
                .await?
        }
    };

    let notifier = state.notifier.clone();
    let welcome = templates::welcome(&user.email, &user.name);
    tokio::spawn(async move {
        let to = welcome.to.clone();
        if let Err(e) = notifier.send(welcome).await {
            tracing::warn!("[Auth] Failed to send welcome mail to {}: {}", to, e);
        }
    });

    let response = AuthResponse::issue(state.auth.keys(), &user)?;
    tracing::info!("[Auth] User registered: {} ({})", user.id, user.email);
    Ok((StatusCode::CREATED, Json(response)))
}
