/**
 * Document Handlers
 *
 * HTTP handlers for `/api/documents`. Each handler parses the path and body,
 * hands the authenticated caller to `DocumentService`, and maps the result to
 * a status code. Errors render through `BackendError`'s `IntoResponse`.
 *
 * All routes sit behind `auth_middleware`.
 */

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::documents::service::DocumentService;
use crate::backend::documents::types::{
    CreateDocumentRequest, InviteRequest, InviteResponse, SetCollaboratorsRequest,
    ShareEmailRequest, ShareEmailResponse, ShareGrantRequest, UpdateDocumentRequest,
};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::shared::document::DocumentPatch;
use crate::shared::{Document, DocumentId, DocumentKind, ShareGrant, SharedUser, UserId};

/// Unparseable ids are reported like missing documents
fn parse_document_id(raw: &str) -> Result<DocumentId, BackendError> {
    raw.parse()
        .map_err(|_| BackendError::not_found("Document not found"))
}

/// `GET /api/documents`
pub async fn list_documents(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<Document>>, BackendError> {
    Ok(Json(service.list(caller.user_id).await?))
}

/// `POST /api/documents`
pub async fn create_document(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), BackendError> {
    let kind = match request.file_type.as_deref() {
        Some(raw) => raw.parse::<DocumentKind>()?,
        None => DocumentKind::default(),
    };
    let doc = service
        .create(caller.user_id, &request.title, request.content, kind)
        .await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// `POST /api/documents/import`
///
/// Multipart fields: `file` (the upload) and `fileType` (`md` or `txt`).
pub async fn import_document(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), BackendError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut declared_kind = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("[Documents] Malformed multipart body: {}", e);
        BackendError::validation("file", e.body_text())
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("Untitled").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| BackendError::validation("file", e.body_text()))?;
                upload = Some((file_name, bytes.to_vec()));
            }
            Some("fileType") => {
                declared_kind = field
                    .text()
                    .await
                    .map_err(|e| BackendError::validation("fileType", e.body_text()))?;
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| BackendError::validation("file", "No file uploaded"))?;
    let doc = service
        .import_from(caller.user_id, &file_name, &bytes, &declared_kind)
        .await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// `GET /api/documents/{id}`
pub async fn get_document(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Document>, BackendError> {
    let id = parse_document_id(&id)?;
    Ok(Json(service.get(caller.user_id, id).await?))
}

/// `PUT /api/documents/{id}`
pub async fn update_document(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<Json<Document>, BackendError> {
    let id = parse_document_id(&id)?;
    let patch = DocumentPatch::from_raw(request.title, request.content, request.file_type);
    Ok(Json(service.update(caller.user_id, id, patch).await?))
}

/// `DELETE /api/documents/{id}`
pub async fn delete_document(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, BackendError> {
    let id = parse_document_id(&id)?;
    service.delete(caller.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/documents/{id}/duplicate`
pub async fn duplicate_document(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Document>), BackendError> {
    let id = parse_document_id(&id)?;
    let copy = service.duplicate(caller.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// `POST /api/documents/{id}/share`
pub async fn set_collaborators(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<SetCollaboratorsRequest>,
) -> Result<Json<Document>, BackendError> {
    let id = parse_document_id(&id)?;
    let doc = service
        .set_collaborators(caller.user_id, id, &request.collaborator_ids)
        .await?;
    Ok(Json(doc))
}

/// `PATCH /api/documents/{id}/public`
pub async fn toggle_public(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Document>, BackendError> {
    let id = parse_document_id(&id)?;
    Ok(Json(service.toggle_public(caller.user_id, id).await?))
}

/// `GET /api/documents/{id}/users`
pub async fn list_shared_users(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<SharedUser>>, BackendError> {
    let id = parse_document_id(&id)?;
    Ok(Json(service.list_shared_users(caller.user_id, id).await?))
}

/// `POST /api/documents/{id}/invite`
pub async fn invite_user(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<InviteRequest>,
) -> Result<Json<InviteResponse>, BackendError> {
    let id = parse_document_id(&id)?;
    let invited = service
        .invite(caller.user_id, id, &request.email, request.permission)
        .await?;
    Ok(Json(invited))
}

/// `DELETE /api/documents/{id}/users/{user_id}`
pub async fn remove_collaborator(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, BackendError> {
    let id = parse_document_id(&id)?;
    let target: UserId = user_id
        .parse()
        .map_err(|_| BackendError::not_found("User is not a collaborator"))?;
    service.remove_collaborator(caller.user_id, id, target).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/documents/{id}/share-email`
pub async fn share_by_email(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<ShareEmailRequest>,
) -> Result<Json<ShareEmailResponse>, BackendError> {
    let id = parse_document_id(&id)?;
    service
        .share_by_email(
            caller.user_id,
            id,
            &request.email,
            request.permission.unwrap_or_default(),
            request.message.as_deref(),
        )
        .await?;
    Ok(Json(ShareEmailResponse {
        success: true,
        message: "Share email sent successfully".to_string(),
    }))
}

/// `GET /api/documents/{id}/grant`
pub async fn get_share_grant(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ShareGrant>, BackendError> {
    let id = parse_document_id(&id)?;
    Ok(Json(service.get_share_grant(caller.user_id, id).await?))
}

/// `PUT /api/documents/{id}/grant`
pub async fn replace_share_grant(
    State(service): State<DocumentService>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<ShareGrantRequest>,
) -> Result<Json<ShareGrant>, BackendError> {
    let id = parse_document_id(&id)?;
    Ok(Json(service.replace_share_grant(caller.user_id, id, request).await?))
}
