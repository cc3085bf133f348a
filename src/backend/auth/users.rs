/**
 * User Model and Credential Helpers
 *
 * This module defines the stored identity record and the helpers that work
 * on it: email normalisation, bcrypt hashing, reset tokens, and placeholder
 * identities created when an owner invites an email that has not registered.
 *
 * A placeholder has no password hash. It cannot log in until someone
 * registers with its email, at which point the registration claims it and
 * keeps its id.
 */

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::store::{StoreError, UserStore};
use crate::shared::identity::display_initial;
use crate::shared::{PublicUser, UserId};

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum trimmed display name length
pub const MIN_NAME_LEN: usize = 2;

/// How long a password reset token stays valid
pub const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Stored identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Lower-cased, unique
    pub email: String,
    pub name: String,
    /// bcrypt hash; `None` for placeholder identities
    pub password_hash: Option<String>,
    pub reset_token: Option<String>,
    pub reset_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A fully registered identity
    pub fn registered(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            name,
            password_hash: Some(password_hash),
            reset_token: None,
            reset_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A placeholder for an invited email, named after its local part
    pub fn placeholder(email: String) -> Self {
        let now = Utc::now();
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            id: UserId::new(),
            email,
            name,
            password_hash: None,
            reset_token: None,
            reset_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.password_hash.is_none()
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }

    /// Avatar initial derived from the name or email
    pub fn initial(&self) -> String {
        display_initial(&self.name, &self.email)
    }

    /// Whether `token` is this user's unexpired reset token
    pub fn reset_token_valid(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.reset_token.as_deref() == Some(token)
            && self.reset_expires_at.is_some_and(|at| at > now)
    }
}

/// Trim and lower-case an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a password with bcrypt at `cost`
pub fn hash_password(password: &str, cost: u32) -> Result<String, BackendError> {
    bcrypt::hash(password, cost).map_err(|e| {
        tracing::error!("[Auth] Failed to hash password: {:?}", e);
        BackendError::internal("password hashing failed")
    })
}

/// Check a password against a stored hash
///
/// Placeholder identities never match.
pub fn verify_password(password: &str, user: &User) -> Result<bool, BackendError> {
    let Some(hash) = user.password_hash.as_deref() else {
        return Ok(false);
    };
    bcrypt::verify(password, hash).map_err(|e| {
        tracing::error!("[Auth] Password verification error: {:?}", e);
        BackendError::internal("password verification failed")
    })
}

/// 64 hex characters of randomness
pub fn generate_reset_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Expiry for a reset token issued at `now`
pub fn reset_token_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(RESET_TOKEN_TTL_HOURS)
}

/// Find the identity for `email`, creating a placeholder if none exists.
///
/// `email` must already be normalised. If a concurrent request creates the
/// same email first, the stored identity is returned.
pub async fn find_or_create_placeholder(
    users: &dyn UserStore,
    email: &str,
) -> Result<User, StoreError> {
    if let Some(user) = users.find_user_by_email(email).await? {
        return Ok(user);
    }

    match users.create_user(User::placeholder(email.to_string())).await {
        Ok(user) => {
            tracing::info!("[Auth] Created placeholder identity for {}", email);
            Ok(user)
        }
        Err(StoreError::DuplicateEmail(_)) => users
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| StoreError::DuplicateEmail(email.to_string())),
        Err(e) => Err(e),
    }
}
