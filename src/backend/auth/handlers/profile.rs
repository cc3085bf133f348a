/**
 * Profile Handlers
 *
 * Handlers under `/api/users`, all behind `auth_middleware`:
 *
 * - `GET /api/users/me` - own profile
 * - `PUT /api/users/me` - change name and/or email
 * - `DELETE /api/users/me` - delete own account
 * - `GET /api/users/search?query=` - find other users by name or email
 * - `GET /api/users/{id}` - public profile of any user
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;

use crate::backend::auth::handlers::types::{SearchQuery, UpdateProfileRequest};
use crate::backend::auth::users::{normalize_email, User, MIN_NAME_LEN};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::error::validate_email;
use crate::shared::{PublicUser, UserId};

async fn load_self(state: &AppState, id: UserId) -> Result<User, BackendError> {
    state
        .users
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}

/// `GET /api/users/me`
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<PublicUser>, BackendError> {
    Ok(Json(load_self(&state, caller.user_id).await?.to_public()))
}

/// `PUT /api/users/me`
///
/// # Errors
///
/// * `400 Bad Request` - malformed email or too short name
/// * `409 Conflict` - email used by another user
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, BackendError> {
    let mut user = load_self(&state, caller.user_id).await?;

    if let Some(name) = request.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        if name.chars().count() < MIN_NAME_LEN {
            return Err(BackendError::validation(
                "name",
                format!("Name must be at least {} characters long", MIN_NAME_LEN),
            ));
        }
        user.name = name.to_string();
    }

    if let Some(email) = request.email.as_deref().filter(|e| !e.trim().is_empty()) {
        let email = normalize_email(email);
        validate_email(&email)?;
        if email != user.email {
            if let Some(other) = state.users.find_user_by_email(&email).await? {
                if other.id != user.id {
                    return Err(BackendError::conflict("Email already in use"));
                }
            }
            user.email = email;
        }
    }

    user.updated_at = Utc::now();
    state.users.update_user(&user).await?;
    tracing::info!("[Auth] Profile updated: {}", user.id);
    Ok(Json(user.to_public()))
}

/// `DELETE /api/users/me`
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<StatusCode, BackendError> {
    if !state.users.delete_user(caller.user_id).await? {
        return Err(BackendError::not_found("User not found"));
    }
    tracing::info!("[Auth] Account deleted: {}", caller.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/users/search?query=`
///
/// Case-insensitive substring match on name or email, excluding the caller.
pub async fn search_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<PublicUser>>, BackendError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(BackendError::validation("query", "Search query is required"));
    }
    let found = state.users.search_users(query, caller.user_id).await?;
    Ok(Json(found.iter().map(User::to_public).collect()))
}

/// `GET /api/users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>, BackendError> {
    let id: UserId = id
        .parse()
        .map_err(|_| BackendError::not_found("User not found"))?;
    let user = state
        .users
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok(Json(user.to_public()))
}
