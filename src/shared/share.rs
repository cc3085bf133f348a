/**
 * Share Grants
 *
 * A share grant records how an owner intends a document to be shared: a
 * visibility flag, a default permission, an optional expiry, and a list of
 * invited users with their requested permission. Grants are informational;
 * access decisions are made from the document's owner and collaborator set.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::document::DocumentId;
use crate::shared::identity::UserId;

/// Permission level requested for a shared user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    View,
    Edit,
    Comment,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invited user in a share grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedUserEntry {
    /// Resolved identity, when one exists for the email
    pub user_id: Option<UserId>,
    pub email: String,
    #[serde(default)]
    pub permission: Permission,
}

/// Sharing intent recorded by a document owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareGrant {
    pub document_id: DocumentId,
    pub owner_id: UserId,
    pub is_public: bool,
    pub permission: Permission,
    pub expires_at: Option<DateTime<Utc>>,
    pub shared_users: Vec<SharedUserEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShareGrant {
    /// A grant past its expiry is treated as if it did not exist
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
