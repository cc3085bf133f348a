/**
 * Realtime Socket
 *
 * `GET /ws` upgrades an authenticated request to a WebSocket and runs one
 * task per connection. The task multiplexes two sources with `select!`:
 * the session's outbound queue (updates relayed from other members) and
 * inbound frames from the client.
 *
 * # Authentication
 *
 * The bearer token comes from the `Authorization` header or, for browser
 * clients that cannot set headers on a WebSocket, the `token` query
 * parameter. It is resolved through `AuthGate` before the upgrade; a bad
 * credential gets a plain 401.
 *
 * # Room protocol
 *
 * - `join-document` - requires view access
 * - `leave-document` - idempotent
 * - `document-change` - requires membership of the room and edit access
 *
 * Access is judged against the document as currently stored, never a copy
 * taken at join time. Before a change fans out, members who can no longer
 * view the document are evicted from the room and told so with an `error`
 * event, so a revoked collaborator stops receiving as well as sending.
 *
 * Rejected events are answered with an `error` event on the same socket.
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use tokio::{select, sync::mpsc};

use crate::backend::access;
use crate::backend::collab::registry::SessionId;
use crate::backend::collab::relay::ChangeRelay;
use crate::backend::documents::DocumentService;
use crate::backend::error::BackendError;
use crate::backend::middleware::bearer_token;
use crate::backend::server::state::AppState;
use crate::shared::event::DocumentChange;
use crate::shared::{ClientEvent, DocumentId, ServerEvent, UserId};

const ACCESS_REVOKED: &str = "You no longer have access to this document";

/// Query parameters of `GET /ws`
#[derive(Debug, Default, Deserialize)]
pub struct SocketQuery {
    pub token: Option<String>,
}

/// Room state of one connection
pub struct RoomSession {
    id: SessionId,
    user: UserId,
    documents: DocumentService,
    relay: ChangeRelay,
}

impl RoomSession {
    pub fn new(user: UserId, documents: DocumentService, relay: ChangeRelay) -> Self {
        Self {
            id: SessionId::new(),
            user,
            documents,
            relay,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Handle one text frame, returning the event to send back, if any
    pub async fn handle_text(&mut self, text: &str) -> Option<ServerEvent> {
        let event = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!("[Realtime] Malformed frame from {}: {}", self.id, e);
                return Some(ServerEvent::error("Malformed event"));
            }
        };
        self.handle_event(event).await.err().map(ServerEvent::error)
    }

    /// Apply one client event; `Err` carries the message for the client
    pub async fn handle_event(&mut self, event: ClientEvent) -> Result<(), String> {
        match event {
            ClientEvent::JoinDocument(raw) => self.join(&raw).await,
            ClientEvent::LeaveDocument(raw) => {
                self.leave(&raw).await;
                Ok(())
            }
            ClientEvent::DocumentChange(change) => self.change(change).await,
        }
    }

    async fn join(&mut self, raw: &str) -> Result<(), String> {
        let room: DocumentId = raw.parse().map_err(|_| "Document not found".to_string())?;
        let doc = self
            .documents
            .load_viewable(self.user, room)
            .await
            .map_err(|e| e.message())?;

        let can_edit = access::can_edit(&doc, self.user);
        self.relay.registry().join(self.id, room).await;
        tracing::info!(
            "[Realtime] {} joined {} (session {}, edit: {})",
            self.user,
            room,
            self.id,
            can_edit
        );
        Ok(())
    }

    async fn leave(&mut self, raw: &str) {
        let Ok(room) = raw.parse::<DocumentId>() else {
            return;
        };
        self.relay.registry().leave(self.id, room).await;
    }

    async fn change(&mut self, change: DocumentChange) -> Result<(), String> {
        let room: DocumentId = change
            .document_id
            .parse()
            .map_err(|_| "Document not found".to_string())?;

        let registry = self.relay.registry();
        if !registry.is_member(self.id, room).await {
            return Err("Join the document before sending changes".to_string());
        }

        let doc = match self.documents.load_viewable(self.user, room).await {
            Ok(doc) => doc,
            Err(e) => {
                registry.leave(self.id, room).await;
                return Err(e.message());
            }
        };
        if !access::can_edit(&doc, self.user) {
            return Err("You do not have edit access to this document".to_string());
        }

        for (session, queue) in registry
            .evict_members(room, |user| access::can_view(&doc, user))
            .await
        {
            if queue.try_send(ServerEvent::error(ACCESS_REVOKED)).is_err() {
                tracing::debug!("[Realtime] Could not notify evicted session {}", session);
            }
        }

        self.relay.relay_change(self.id, room, change.changes).await;
        Ok(())
    }

    /// Leave every room and drop the session's queue
    pub async fn close(self) {
        let rooms = self.relay.registry().on_disconnect(self.id).await;
        tracing::info!(
            "[Realtime] Session {} of {} closed, left {} room(s)",
            self.id,
            self.user,
            rooms.len()
        );
    }
}

/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<SocketQuery>,
    headers: HeaderMap,
) -> Result<Response, BackendError> {
    let credential = bearer_token(&headers).or(query.token.as_deref());
    let user = state.auth.resolve(credential).await?;

    let session = RoomSession::new(user.user_id, state.documents.clone(), state.relay.clone());
    let capacity = state.config.session_queue_capacity;
    Ok(ws.on_upgrade(move |socket| run_connection(socket, session, capacity)))
}

async fn run_connection(mut socket: WebSocket, mut session: RoomSession, capacity: usize) {
    let (tx, mut rx) = mpsc::channel(capacity);
    session.relay.registry().register(session.id, session.user, tx).await;
    tracing::info!("[Realtime] Session {} connected for {}", session.id, session.user);

    loop {
        select! {
            Some(event) = rx.recv() => {
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            },
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = session.handle_text(text.as_str()).await {
                            if send_event(&mut socket, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("[Realtime] Socket error on {}: {}", session.id, e);
                        break;
                    }
                }
            },
        }
    }

    session.close().await;
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    let encoded = match serde_json::to_string(event) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::error!("[Realtime] Failed to encode event: {}", e);
            return Ok(());
        }
    };
    socket.send(Message::Text(encoded.into())).await
}
