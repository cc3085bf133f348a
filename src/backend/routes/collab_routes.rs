/**
 * Realtime Routes
 *
 * - `GET /ws` - WebSocket upgrade for document rooms. The credential is a
 *   bearer header or a `token` query parameter and is checked before the
 *   upgrade, so this route sits outside the HTTP auth middleware.
 */

use axum::{routing::get, Router};

use crate::backend::collab::ws_handler;
use crate::backend::server::state::AppState;

/// Configure realtime routes
pub fn configure_collab_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/ws", get(ws_handler))
}
