/**
 * Document Service
 *
 * Every operation follows the same shape: load the document, decide with
 * `access::rules`, build the new value, and persist it with one store call.
 *
 * Writes carry the version they were derived from. When another write lands
 * first, the store refuses the stale one and `modify` reloads the document
 * and decides again, access checks included. A caller whose access was
 * revoked in the meantime therefore gets the revocation, not a write that
 * resurrects the old collaborator set. Content is never merged: the last
 * successful write wins.
 */

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::access;
use crate::backend::auth::users::{find_or_create_placeholder, normalize_email};
use crate::backend::documents::types::{InviteResponse, ShareGrantRequest};
use crate::backend::error::BackendError;
use crate::backend::notify::{templates, Notifier};
use crate::backend::store::{DocumentStore, ShareGrantStore, StoreError, UserStore};
use crate::shared::document::{title_from_file_name, DocumentPatch};
use crate::shared::error::validate_email;
use crate::shared::identity::display_initial;
use crate::shared::{
    Document, DocumentId, DocumentKind, Permission, ShareGrant, SharedError, SharedUser,
    SharedUserEntry, SharedUserRole, UserId,
};

const NOT_FOUND: &str = "Document not found";

/// Reloads allowed before a contended write gives up with 409
const WRITE_ATTEMPTS: usize = 5;

fn ensure_viewable(doc: &Document, caller: UserId) -> Result<(), BackendError> {
    if !access::can_view(doc, caller) {
        tracing::info!("[Documents] {} denied view of {}", caller, doc.id);
        return Err(BackendError::concealed(NOT_FOUND));
    }
    Ok(())
}

fn ensure_manager(doc: &Document, caller: UserId, action: &str) -> Result<(), BackendError> {
    ensure_viewable(doc, caller)?;
    if !access::can_manage_collaborators(doc, caller) {
        tracing::warn!("[Documents] {} is not the owner of {} ({})", caller, doc.id, action);
        return Err(BackendError::forbidden(format!(
            "Only the document owner can {}",
            action
        )));
    }
    Ok(())
}

/// Document operations on behalf of an authenticated caller
#[derive(Clone)]
pub struct DocumentService {
    documents: Arc<dyn DocumentStore>,
    grants: Arc<dyn ShareGrantStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
}

impl DocumentService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        grants: Arc<dyn ShareGrantStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            documents,
            grants,
            users,
            notifier,
        }
    }

    /// Load a document the caller may view
    ///
    /// Missing and hidden documents produce the same 404.
    pub async fn load_viewable(&self, caller: UserId, id: DocumentId) -> Result<Document, BackendError> {
        let doc = self.find(id).await?;
        ensure_viewable(&doc, caller)?;
        Ok(doc)
    }

    /// Load a document the caller owns, for management operations
    async fn load_managed(
        &self,
        caller: UserId,
        id: DocumentId,
        action: &str,
    ) -> Result<Document, BackendError> {
        let doc = self.find(id).await?;
        ensure_manager(&doc, caller, action)?;
        Ok(doc)
    }

    async fn find(&self, id: DocumentId) -> Result<Document, BackendError> {
        self.documents
            .find_document(id)
            .await?
            .ok_or_else(|| BackendError::not_found(NOT_FOUND))
    }

    /// Read-decide-write with a version check.
    ///
    /// `decide` sees the current document and returns the new value, or
    /// `None` to leave it untouched. It runs again on every reload, so the
    /// access checks inside it always judge the latest state.
    async fn modify<F>(&self, id: DocumentId, mut decide: F) -> Result<Document, BackendError>
    where
        F: FnMut(&Document) -> Result<Option<Document>, BackendError>,
    {
        for attempt in 1..=WRITE_ATTEMPTS {
            let current = self.find(id).await?;
            let Some(updated) = decide(&current)? else {
                return Ok(current);
            };
            match self.documents.replace_document(&updated).await {
                Ok(Some(saved)) => return Ok(saved),
                Ok(None) => return Err(BackendError::not_found(NOT_FOUND)),
                Err(StoreError::VersionConflict(_)) => {
                    tracing::debug!("[Documents] Write to {} lost a race (attempt {})", id, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        }
        tracing::warn!("[Documents] Giving up on {} after {} contended writes", id, WRITE_ATTEMPTS);
        Err(StoreError::VersionConflict(id).into())
    }

    pub async fn create(
        &self,
        caller: UserId,
        title: &str,
        content: String,
        kind: DocumentKind,
    ) -> Result<Document, BackendError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BackendError::validation("title", "Title is required"));
        }
        let doc = Document::new(caller, title.to_string(), content, kind);
        let doc = self.documents.insert_document(&doc).await?;
        tracing::info!("[Documents] {} created {}", caller, doc.id);
        Ok(doc)
    }

    /// Create a document from an uploaded text file
    pub async fn import_from(
        &self,
        caller: UserId,
        file_name: &str,
        bytes: &[u8],
        declared_kind: &str,
    ) -> Result<Document, BackendError> {
        let kind: DocumentKind = declared_kind.parse()?;
        if !kind.is_importable() {
            return Err(SharedError::unsupported_kind(kind.as_str()).into());
        }
        let content = String::from_utf8_lossy(bytes).into_owned();
        let doc = Document::new(caller, title_from_file_name(file_name), content, kind);
        let doc = self.documents.insert_document(&doc).await?;
        tracing::info!("[Documents] {} imported {} as {}", caller, file_name, doc.id);
        Ok(doc)
    }

    /// Documents the caller owns or collaborates on, newest first
    pub async fn list(&self, caller: UserId) -> Result<Vec<Document>, BackendError> {
        Ok(self.documents.list_documents_for(caller).await?)
    }

    pub async fn get(&self, caller: UserId, id: DocumentId) -> Result<Document, BackendError> {
        self.load_viewable(caller, id).await
    }

    pub async fn update(
        &self,
        caller: UserId,
        id: DocumentId,
        patch: DocumentPatch,
    ) -> Result<Document, BackendError> {
        self.modify(id, |doc| {
            ensure_viewable(doc, caller)?;
            if !access::can_edit(doc, caller) {
                tracing::info!("[Documents] {} denied edit of {}", caller, id);
                return Err(BackendError::concealed(NOT_FOUND));
            }
            Ok(Some(patch.clone().apply(doc, Utc::now())))
        })
        .await
    }

    pub async fn delete(&self, caller: UserId, id: DocumentId) -> Result<(), BackendError> {
        let doc = self.load_viewable(caller, id).await?;
        if !access::can_delete(&doc, caller) {
            tracing::info!("[Documents] {} denied delete of {}", caller, id);
            return Err(BackendError::concealed(NOT_FOUND));
        }
        if !self.documents.delete_document(id).await? {
            return Err(BackendError::not_found(NOT_FOUND));
        }
        self.grants.delete_grant(id).await?;
        tracing::info!("[Documents] {} deleted {}", caller, id);
        Ok(())
    }

    /// Private copy owned by the caller
    pub async fn duplicate(&self, caller: UserId, id: DocumentId) -> Result<Document, BackendError> {
        let doc = self.load_viewable(caller, id).await?;
        let copy = self.documents.insert_document(&doc.duplicate_for(caller)).await?;
        tracing::info!("[Documents] {} duplicated {} as {}", caller, id, copy.id);
        Ok(copy)
    }

    /// Replace the entire collaborator set
    pub async fn set_collaborators(
        &self,
        caller: UserId,
        id: DocumentId,
        collaborator_ids: &[UserId],
    ) -> Result<Document, BackendError> {
        let doc = self.load_managed(caller, id, "share this document").await?;
        let proposed = access::replace_collaborators(&doc, collaborator_ids)?;

        let known = self.users.find_users_by_ids(&proposed.collaborators).await?;
        if let Some(unknown) = proposed
            .collaborators
            .iter()
            .find(|c| !known.iter().any(|u| u.id == **c))
        {
            return Err(BackendError::validation(
                "collaboratorIds",
                format!("Unknown user: {}", unknown),
            ));
        }

        self.modify(id, |doc| {
            ensure_manager(doc, caller, "share this document")?;
            let updated = access::replace_collaborators(doc, collaborator_ids)?;
            Ok(Some(Document {
                last_modified: Utc::now(),
                ..updated
            }))
        })
        .await
    }

    pub async fn toggle_public(&self, caller: UserId, id: DocumentId) -> Result<Document, BackendError> {
        let saved = self
            .modify(id, |doc| {
                ensure_manager(doc, caller, "change visibility")?;
                Ok(Some(Document {
                    is_public: !doc.is_public,
                    last_modified: Utc::now(),
                    ..doc.clone()
                }))
            })
            .await?;
        tracing::info!("[Documents] {} is now public: {}", id, saved.is_public);
        Ok(saved)
    }

    /// Owner first, then collaborators, each labelled with their role
    pub async fn list_shared_users(
        &self,
        caller: UserId,
        id: DocumentId,
    ) -> Result<Vec<SharedUser>, BackendError> {
        let doc = self.load_viewable(caller, id).await?;

        let mut ids = Vec::with_capacity(doc.collaborators.len() + 1);
        ids.push(doc.owner);
        ids.extend(doc.collaborators.iter().copied());

        let found: HashMap<UserId, _> = self
            .users
            .find_users_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| found.get(id))
            .map(|user| SharedUser {
                id: user.id,
                email: user.email.clone(),
                permission: if user.id == doc.owner {
                    SharedUserRole::Owner
                } else {
                    SharedUserRole::Collaborator
                },
                avatar: user.initial(),
            })
            .collect())
    }

    /// Add the identity behind `email` as a collaborator, creating a
    /// placeholder identity when the email is unknown.
    ///
    /// The permission is echoed back; the collaborator set itself only
    /// carries edit access.
    pub async fn invite(
        &self,
        caller: UserId,
        id: DocumentId,
        email: &str,
        permission: Permission,
    ) -> Result<InviteResponse, BackendError> {
        self.load_managed(caller, id, "invite users").await?;
        let email = normalize_email(email);
        validate_email(&email)?;

        let invitee = find_or_create_placeholder(self.users.as_ref(), &email).await?;
        self.modify(id, |doc| {
            ensure_manager(doc, caller, "invite users")?;
            let updated = access::add_collaborator(doc, invitee.id)?;
            Ok((updated.collaborators != doc.collaborators).then_some(updated))
        })
        .await?;
        tracing::info!("[Documents] {} invited {} to {}", caller, invitee.id, id);

        Ok(InviteResponse {
            id: invitee.id,
            email: invitee.email.clone(),
            permission,
            avatar: display_initial(&invitee.name, &invitee.email),
        })
    }

    pub async fn remove_collaborator(
        &self,
        caller: UserId,
        id: DocumentId,
        target: UserId,
    ) -> Result<(), BackendError> {
        self.modify(id, |doc| {
            ensure_manager(doc, caller, "remove collaborators")?;
            access::remove_collaborator(doc, target).map(Some)
        })
        .await?;
        tracing::info!("[Documents] {} removed {} from {}", caller, target, id);
        Ok(())
    }

    /// Mail `email` about the document without touching its state
    pub async fn share_by_email(
        &self,
        caller: UserId,
        id: DocumentId,
        email: &str,
        permission: Permission,
        message: Option<&str>,
    ) -> Result<(), BackendError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(BackendError::validation("email", "Email is required"));
        }
        let doc = self.load_managed(caller, id, "share this document").await?;

        let sender = match self.users.find_user_by_id(caller).await? {
            Some(user) if !user.name.trim().is_empty() => user.name,
            Some(user) => user.email,
            None => return Err(BackendError::Unauthenticated),
        };

        let mail = templates::share_document(email, &sender, &doc.title, permission, message);
        self.notifier.send(mail).await.map_err(|e| {
            tracing::error!("[Documents] Share mail for {} to {} failed: {}", id, email, e);
            BackendError::delivery("Failed to send email. Please check your email configuration.")
        })?;
        Ok(())
    }

    /// The document's share grant, if one exists and has not expired
    pub async fn get_share_grant(&self, caller: UserId, id: DocumentId) -> Result<ShareGrant, BackendError> {
        self.load_viewable(caller, id).await?;
        match self.grants.find_grant(id).await? {
            Some(grant) if !grant.is_expired(Utc::now()) => Ok(grant),
            _ => Err(BackendError::not_found("Share grant not found")),
        }
    }

    /// Create or replace the document's share grant
    ///
    /// Emails are normalised and resolved to existing identities; unknown
    /// emails are kept without an id. No placeholder is created.
    pub async fn replace_share_grant(
        &self,
        caller: UserId,
        id: DocumentId,
        request: ShareGrantRequest,
    ) -> Result<ShareGrant, BackendError> {
        let doc = self.load_managed(caller, id, "change sharing settings").await?;

        let mut shared_users: Vec<SharedUserEntry> = Vec::with_capacity(request.shared_users.len());
        for entry in request.shared_users {
            let email = normalize_email(&entry.email);
            validate_email(&email)?;
            if shared_users.iter().any(|e| e.email == email) {
                continue;
            }
            let user_id = self.users.find_user_by_email(&email).await?.map(|u| u.id);
            shared_users.push(SharedUserEntry {
                user_id,
                email,
                permission: entry.permission,
            });
        }

        let now = Utc::now();
        let created_at = self
            .grants
            .find_grant(id)
            .await?
            .map_or(now, |existing| existing.created_at);

        let grant = ShareGrant {
            document_id: id,
            owner_id: doc.owner,
            is_public: request.is_public,
            permission: request.permission,
            expires_at: request.expires_at,
            shared_users,
            created_at,
            updated_at: now,
        };
        let grant = self.grants.upsert_grant(&grant).await?;
        tracing::info!("[Documents] {} replaced share grant of {}", caller, id);
        Ok(grant)
    }
}
