/**
 * PostgreSQL Store
 *
 * `sqlx` implementation of the store capabilities. Queries are checked at
 * runtime (`query_as` with `FromRow` row types) so the crate builds without a
 * live database. The schema lives in `migrations/` and is applied at startup
 * by `server::config::load_database`.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::store::{like_pattern, DocumentStore, ShareGrantStore, StoreError, UserStore};
use crate::shared::{
    Document, DocumentId, DocumentKind, Permission, ShareGrant, SharedUserEntry, UserId,
};

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str =
    "id, email, name, password_hash, reset_token, reset_expires_at, created_at, updated_at";

const DOCUMENT_COLUMNS: &str =
    "id, title, content, file_type, owner_id, collaborators, is_public, version, last_modified, created_at";

const GRANT_COLUMNS: &str =
    "document_id, owner_id, is_public, permission, expires_at, shared_users, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    password_hash: Option<String>,
    reset_token: Option<String>,
    reset_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.id),
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            reset_token: row.reset_token,
            reset_expires_at: row.reset_expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    title: String,
    content: String,
    file_type: String,
    owner_id: Uuid,
    collaborators: Vec<Uuid>,
    is_public: bool,
    version: i64,
    last_modified: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let file_type: DocumentKind = row
            .file_type
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("document {} has file_type {}", row.id, row.file_type)))?;
        Ok(Document {
            id: DocumentId(row.id),
            title: row.title,
            content: row.content,
            file_type,
            owner: UserId(row.owner_id),
            collaborators: row.collaborators.into_iter().map(UserId).collect(),
            is_public: row.is_public,
            version: row.version,
            last_modified: row.last_modified,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct GrantRow {
    document_id: Uuid,
    owner_id: Uuid,
    is_public: bool,
    permission: String,
    expires_at: Option<DateTime<Utc>>,
    shared_users: Json<Vec<SharedUserEntry>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_permission(raw: &str) -> Result<Permission, StoreError> {
    match raw {
        "view" => Ok(Permission::View),
        "edit" => Ok(Permission::Edit),
        "comment" => Ok(Permission::Comment),
        other => Err(StoreError::Corrupt(format!("unknown permission {}", other))),
    }
}

impl TryFrom<GrantRow> for ShareGrant {
    type Error = StoreError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        Ok(ShareGrant {
            document_id: DocumentId(row.document_id),
            owner_id: UserId(row.owner_id),
            is_public: row.is_public,
            permission: parse_permission(&row.permission)?,
            expires_at: row.expires_at,
            shared_users: row.shared_users.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Map a unique violation on `users.email` to `DuplicateEmail`
fn map_user_write_error(err: sqlx::Error, email: &str) -> StoreError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        StoreError::DuplicateEmail(email.to_string())
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id.0)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(&user.reset_token)
            .bind(user.reset_expires_at)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_user_write_error(e, &user.email))?;
        Ok(row.into())
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = lower($1)");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_user_by_reset_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE reset_token = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, StoreError> {
        let raw: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(raw)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET email = $2, name = $3, password_hash = $4, reset_token = $5,
                reset_expires_at = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.reset_token)
        .bind(user.reset_expires_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_user_write_error(e, &user.email))?;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search_users(&self, query: &str, exclude: UserId) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id <> $1 AND (name ILIKE $2 OR email ILIKE $2) ORDER BY name"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(exclude.0)
            .bind(like_pattern(query))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_document(&self, doc: &Document) -> Result<Document, StoreError> {
        let collaborators: Vec<Uuid> = doc.collaborators.iter().map(|id| id.0).collect();
        let sql = format!(
            "INSERT INTO documents ({DOCUMENT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {DOCUMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(doc.id.0)
            .bind(&doc.title)
            .bind(&doc.content)
            .bind(doc.file_type.as_str())
            .bind(doc.owner.0)
            .bind(collaborators)
            .bind(doc.is_public)
            .bind(doc.version)
            .bind(doc.last_modified)
            .bind(doc.created_at)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn find_document(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1");
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn replace_document(&self, doc: &Document) -> Result<Option<Document>, StoreError> {
        let collaborators: Vec<Uuid> = doc.collaborators.iter().map(|id| id.0).collect();
        let sql = format!(
            r#"
            UPDATE documents
            SET title = $2, content = $3, file_type = $4, collaborators = $5,
                is_public = $6, last_modified = $7, version = version + 1
            WHERE id = $1 AND version = $8
            RETURNING {DOCUMENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(doc.id.0)
            .bind(&doc.title)
            .bind(&doc.content)
            .bind(doc.file_type.as_str())
            .bind(collaborators)
            .bind(doc.is_public)
            .bind(doc.last_modified)
            .bind(doc.version)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row.try_into().map(Some),
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM documents WHERE id = $1)")
                        .bind(doc.id.0)
                        .fetch_one(&self.pool)
                        .await?;
                if exists {
                    Err(StoreError::VersionConflict(doc.id))
                } else {
                    Ok(None)
                }
            }
        }
    }

    async fn delete_document(&self, id: DocumentId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_documents_for(&self, user: UserId) -> Result<Vec<Document>, StoreError> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE owner_id = $1 OR $1 = ANY(collaborators) ORDER BY last_modified DESC"
        );
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(user.0)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[async_trait]
impl ShareGrantStore for PgStore {
    async fn find_grant(&self, document_id: DocumentId) -> Result<Option<ShareGrant>, StoreError> {
        let sql = format!("SELECT {GRANT_COLUMNS} FROM share_grants WHERE document_id = $1");
        let row = sqlx::query_as::<_, GrantRow>(&sql)
            .bind(document_id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn upsert_grant(&self, grant: &ShareGrant) -> Result<ShareGrant, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO share_grants ({GRANT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (document_id) DO UPDATE
            SET is_public = EXCLUDED.is_public,
                permission = EXCLUDED.permission,
                expires_at = EXCLUDED.expires_at,
                shared_users = EXCLUDED.shared_users,
                updated_at = EXCLUDED.updated_at
            RETURNING {GRANT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, GrantRow>(&sql)
            .bind(grant.document_id.0)
            .bind(grant.owner_id.0)
            .bind(grant.is_public)
            .bind(grant.permission.as_str())
            .bind(grant.expires_at)
            .bind(Json(&grant.shared_users))
            .bind(grant.created_at)
            .bind(grant.updated_at)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn delete_grant(&self, document_id: DocumentId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM share_grants WHERE document_id = $1")
            .bind(document_id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
