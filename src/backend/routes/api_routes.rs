/**
 * API Route Handlers
 *
 * This module mounts the JSON API.
 *
 * # Routes
 *
 * ## Authentication (public)
 * - `POST /api/auth/register` - Create an account, or claim an invited email
 * - `POST /api/auth/login` - Exchange credentials for a token
 * - `POST /api/auth/request-reset` - Mail a password reset link
 * - `POST /api/auth/reset-password` - Set a new password with a reset token
 *
 * ## Users (authenticated)
 * - `GET|PUT|DELETE /api/users/me`
 * - `GET /api/users/search?query=`
 * - `GET /api/users/{id}`
 *
 * ## Documents (authenticated)
 * - `GET|POST /api/documents`, `POST /api/documents/import`
 * - `GET|PUT|DELETE /api/documents/{id}`, `POST /api/documents/{id}/duplicate`
 * - `POST /api/documents/{id}/share`, `PATCH /api/documents/{id}/public`
 * - `GET /api/documents/{id}/users`, `DELETE /api/documents/{id}/users/{user_id}`
 * - `POST /api/documents/{id}/invite`, `POST /api/documents/{id}/share-email`
 * - `GET|PUT /api/documents/{id}/grant`
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};

use crate::backend::auth::handlers::{
    delete_me, get_me, get_user, login, register, request_reset, reset_password, search_users,
    update_me,
};
use crate::backend::documents::handlers::{
    create_document, delete_document, duplicate_document, get_document, get_share_grant,
    import_document, invite_user, list_documents, list_shared_users, remove_collaborator,
    replace_share_grant, set_collaborators, share_by_email, toggle_public, update_document,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Authentication routes are public. User and document routes are wrapped
/// in `auth_middleware`, which answers 401 before the handler runs when
/// the bearer token is missing or invalid.
pub fn configure_api_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/request-reset", post(request_reset))
        .route("/api/auth/reset-password", post(reset_password));

    let protected = Router::new()
        // Users
        .route("/api/users/me", get(get_me).put(update_me).delete(delete_me))
        .route("/api/users/search", get(search_users))
        .route("/api/users/{id}", get(get_user))
        // Documents
        .route("/api/documents", get(list_documents).post(create_document))
        .route("/api/documents/import", post(import_document))
        .route(
            "/api/documents/{id}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/api/documents/{id}/duplicate", post(duplicate_document))
        .route("/api/documents/{id}/share", post(set_collaborators))
        .route("/api/documents/{id}/public", patch(toggle_public))
        .route("/api/documents/{id}/users", get(list_shared_users))
        .route("/api/documents/{id}/users/{user_id}", delete(remove_collaborator))
        .route("/api/documents/{id}/invite", post(invite_user))
        .route("/api/documents/{id}/share-email", post(share_by_email))
        .route(
            "/api/documents/{id}/grant",
            get(get_share_grant).put(replace_share_grant),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    router.merge(public).merge(protected)
}
