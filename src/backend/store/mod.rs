//! Store Module
//!
//! This module defines the persistence capabilities the backend relies on and
//! their implementations. Handlers and services only see the traits; the
//! concrete store is chosen at startup.
//!
//! # Capabilities
//!
//! - **`UserStore`** - create/find/update/delete identities
//! - **`DocumentStore`** - plain CRUD over documents
//! - **`ShareGrantStore`** - share grants keyed by document
//!
//! # Implementations
//!
//! - **`memory`** - `MemoryStore`, process-local maps behind `tokio::sync::RwLock`
//! - **`postgres`** - `PgStore`, PostgreSQL through `sqlx`
//!
//! # Write model
//!
//! Every document change is a single `replace_document` call carrying the
//! complete new value and the `version` it was derived from. The write only
//! lands if the stored version still matches; otherwise it fails with
//! `VersionConflict` and the caller reloads. Content itself is never merged.

use async_trait::async_trait;
use thiserror::Error;

use crate::backend::auth::users::User;
use crate::shared::{Document, DocumentId, ShareGrant, UserId};

/// In-memory store
pub mod memory;

/// PostgreSQL store
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The email is already used by another identity
    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),

    /// The document changed since the caller read it
    #[error("Document {0} was modified concurrently")]
    VersionConflict(DocumentId),

    /// A stored row could not be mapped back to a domain value
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Identity persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new identity. Fails with `DuplicateEmail` if the email is taken.
    async fn create_user(&self, user: User) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Lookup by email, case-insensitively
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_reset_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// Fetch every identity in `ids` that exists, in no particular order
    async fn find_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, StoreError>;

    /// Overwrite an identity. Fails with `DuplicateEmail` if the new email is taken.
    async fn update_user(&self, user: &User) -> Result<(), StoreError>;

    /// Returns whether an identity was removed
    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError>;

    /// Case-insensitive substring match on name or email, excluding `exclude`
    async fn search_users(&self, query: &str, exclude: UserId) -> Result<Vec<User>, StoreError>;
}

/// Document persistence
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_document(&self, doc: &Document) -> Result<Document, StoreError>;

    async fn find_document(&self, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// Overwrite the stored document with `doc`, bumping its version.
    ///
    /// `doc.version` is the version the caller read. Fails with
    /// `VersionConflict` when the stored version differs, and returns `None`
    /// when the document no longer exists.
    async fn replace_document(&self, doc: &Document) -> Result<Option<Document>, StoreError>;

    /// Returns whether a document was removed
    async fn delete_document(&self, id: DocumentId) -> Result<bool, StoreError>;

    /// Documents owned by or shared with `user`, most recently modified first
    async fn list_documents_for(&self, user: UserId) -> Result<Vec<Document>, StoreError>;
}

/// Share grant persistence
#[async_trait]
pub trait ShareGrantStore: Send + Sync {
    async fn find_grant(&self, document_id: DocumentId) -> Result<Option<ShareGrant>, StoreError>;

    /// Insert or replace the grant for its document
    async fn upsert_grant(&self, grant: &ShareGrant) -> Result<ShareGrant, StoreError>;

    async fn delete_grant(&self, document_id: DocumentId) -> Result<(), StoreError>;
}

/// Escape `%`, `_` and `\` so `query` matches literally inside a LIKE pattern
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
