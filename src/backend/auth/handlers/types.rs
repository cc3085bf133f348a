/**
 * Authentication Handler Types
 *
 * Request and response types for the `/api/auth` and `/api/users` handlers.
 * Missing string fields deserialize as empty so the handlers can answer with
 * a validation message instead of a body rejection.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::shared::PublicUser;

/// `POST /api/auth/register`
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// `POST /api/auth/login`
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by register and login
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user: PublicUser,
}

/// `POST /api/auth/request-reset`
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RequestResetRequest {
    #[serde(default)]
    pub email: String,
}

/// `POST /api/auth/reset-password`
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `PUT /api/users/me`
///
/// Absent or empty fields are left unchanged.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// `GET /api/users/search?query=`
#[derive(Deserialize, Debug, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

impl AuthResponse {
    /// Issue a token for `user`
    pub fn issue(keys: &SessionKeys, user: &User) -> Result<Self, BackendError> {
        let token = keys.create_token(user.id, &user.email).map_err(|e| {
            tracing::error!("[Auth] Failed to create token: {:?}", e);
            BackendError::internal("token creation failed")
        })?;
        Ok(Self {
            token,
            user: user.to_public(),
        })
    }
}
