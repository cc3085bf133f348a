/**
 * In-Memory Store
 *
 * Process-local implementation of every store capability. Used by the test
 * suite and by the server when `DATABASE_URL` is not set, in which case all
 * data is lost on restart.
 *
 * Each map sits behind its own `tokio::sync::RwLock`; no lock is held across
 * an await on another lock.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::auth::users::User;
use crate::backend::store::{DocumentStore, ShareGrantStore, StoreError, UserStore};
use crate::shared::{Document, DocumentId, ShareGrant, UserId};

/// In-memory implementation of all store capabilities
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    documents: Arc<RwLock<HashMap<DocumentId, Document>>>,
    grants: Arc<RwLock<HashMap<DocumentId, ShareGrant>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<UserId, User>, email: &str, except: Option<UserId>) -> bool {
    users
        .values()
        .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_reset_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn find_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, Some(user.id)) {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }
        if let Some(existing) = users.get_mut(&user.id) {
            *existing = user.clone();
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn search_users(&self, query: &str, exclude: UserId) -> Result<Vec<User>, StoreError> {
        let needle = query.to_lowercase();
        let users = self.users.read().await;
        let mut found: Vec<User> = users
            .values()
            .filter(|u| u.id != exclude)
            .filter(|u| {
                u.name.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_document(&self, doc: &Document) -> Result<Document, StoreError> {
        self.documents.write().await.insert(doc.id, doc.clone());
        Ok(doc.clone())
    }

    async fn find_document(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn replace_document(&self, doc: &Document) -> Result<Option<Document>, StoreError> {
        let mut documents = self.documents.write().await;
        let Some(stored) = documents.get_mut(&doc.id) else {
            return Ok(None);
        };
        if stored.version != doc.version {
            return Err(StoreError::VersionConflict(doc.id));
        }
        let version = stored.version + 1;
        *stored = Document {
            version,
            ..doc.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete_document(&self, id: DocumentId) -> Result<bool, StoreError> {
        let removed = self.documents.write().await.remove(&id).is_some();
        if removed {
            self.grants.write().await.remove(&id);
        }
        Ok(removed)
    }

    async fn list_documents_for(&self, user: UserId) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;
        let mut found: Vec<Document> = documents
            .values()
            .filter(|d| d.owner == user || d.has_collaborator(user))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(found)
    }
}

#[async_trait]
impl ShareGrantStore for MemoryStore {
    async fn find_grant(&self, document_id: DocumentId) -> Result<Option<ShareGrant>, StoreError> {
        Ok(self.grants.read().await.get(&document_id).cloned())
    }

    async fn upsert_grant(&self, grant: &ShareGrant) -> Result<ShareGrant, StoreError> {
        self.grants
            .write()
            .await
            .insert(grant.document_id, grant.clone());
        Ok(grant.clone())
    }

    async fn delete_grant(&self, document_id: DocumentId) -> Result<(), StoreError> {
        self.grants.write().await.remove(&document_id);
        Ok(())
    }
}
