/**
 * Document Handler Types
 *
 * Request and response bodies for the `/api/documents` routes. Field names
 * are camelCase on the wire.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{Permission, UserId};

/// `POST /api/documents`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Defaults to markdown when absent
    pub file_type: Option<String>,
}

/// `PUT /api/documents/{id}`
///
/// Absent or empty fields leave the stored value untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub file_type: Option<String>,
}

/// `POST /api/documents/{id}/share`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCollaboratorsRequest {
    pub collaborator_ids: Vec<UserId>,
}

/// `POST /api/documents/{id}/invite`
#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
    #[serde(default)]
    pub permission: Permission,
}

/// Invited identity with the requested permission echoed back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteResponse {
    pub id: UserId,
    pub email: String,
    pub permission: Permission,
    pub avatar: String,
}

/// `POST /api/documents/{id}/share-email`
#[derive(Debug, Deserialize)]
pub struct ShareEmailRequest {
    #[serde(default)]
    pub email: String,
    pub permission: Option<Permission>,
    pub message: Option<String>,
}

/// Result of a share-by-email request
#[derive(Debug, Serialize, Deserialize)]
pub struct ShareEmailResponse {
    pub success: bool,
    pub message: String,
}

/// One invited user in a share grant request
#[derive(Debug, Deserialize)]
pub struct SharedUserRequest {
    pub email: String,
    #[serde(default)]
    pub permission: Permission,
}

/// `PUT /api/documents/{id}/grant`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareGrantRequest {
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub permission: Permission,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shared_users: Vec<SharedUserRequest>,
}
