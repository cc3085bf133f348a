/**
 * Identity Types
 *
 * This module defines the user identifier and the user views that are safe to
 * return to clients. Password hashes and reset tokens never leave the backend.
 */
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque user identifier
///
/// Ownership and collaborator checks compare these by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// User information that is safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// User's unique ID
    pub id: UserId,
    /// User's email address (lower-cased)
    pub email: String,
    /// Display name
    pub name: String,
}

/// Role of a user within a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharedUserRole {
    Owner,
    Collaborator,
}

/// Entry in a document's shared-user listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedUser {
    pub id: UserId,
    pub email: String,
    /// Owner or collaborator
    pub permission: SharedUserRole,
    /// Single upper-case initial for avatar rendering
    pub avatar: String,
}

/// Upper-cased first character of the name, falling back to the email.
pub fn display_initial(name: &str, email: &str) -> String {
    name.trim()
        .chars()
        .next()
        .or_else(|| email.chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
