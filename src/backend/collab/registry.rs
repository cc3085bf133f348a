/**
 * Session Registry
 *
 * Tracks which realtime sessions are in which document rooms, and the
 * outbound queue of each session. The registry is created once at startup
 * and handed to the socket handlers through `AppState`; tests build their
 * own.
 *
 * # Invariants
 *
 * - `rooms[r]` contains `s` iff `joined[s]` contains `r`
 * - Empty rooms and sessions without rooms are removed from the maps
 * - After `on_disconnect(s)`, `s` is in no room and has no queue
 *
 * Membership is not an access grant. Each registered session records its
 * user so `evict_members` can drop those who lost access to a document.
 *
 * All mutations take the write lock, so events on a room's membership are
 * applied in the order they acquire it.
 */

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::shared::{DocumentId, ServerEvent, UserId};

/// Identifier of one realtime connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outbound queue of a session
pub type SessionSender = mpsc::Sender<ServerEvent>;

#[derive(Debug, Clone)]
struct SessionHandle {
    user: UserId,
    sender: SessionSender,
}

#[derive(Debug, Default)]
struct Rooms {
    /// room -> sessions in it
    rooms: HashMap<DocumentId, HashSet<SessionId>>,
    /// session -> rooms it joined
    joined: HashMap<SessionId, HashSet<DocumentId>>,
    /// session -> owner and outbound queue
    sessions: HashMap<SessionId, SessionHandle>,
}

/// Room membership of connected sessions
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<Rooms>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the user and outbound queue of a newly connected session
    pub async fn register(&self, session: SessionId, user: UserId, sender: SessionSender) {
        self.inner
            .write()
            .await
            .sessions
            .insert(session, SessionHandle { user, sender });
        tracing::debug!("[Realtime] Session {} registered for {}", session, user);
    }

    /// Add `session` to `room`. Returns whether it was not already a member.
    pub async fn join(&self, session: SessionId, room: DocumentId) -> bool {
        let mut inner = self.inner.write().await;
        let added = inner.rooms.entry(room).or_default().insert(session);
        inner.joined.entry(session).or_default().insert(room);
        if added {
            tracing::debug!("[Realtime] Session {} joined {}", session, room);
        }
        added
    }

    /// Remove `session` from `room`. Returns whether it was a member.
    pub async fn leave(&self, session: SessionId, room: DocumentId) -> bool {
        let mut inner = self.inner.write().await;
        let removed = inner.remove_member(session, room);
        if removed {
            tracing::debug!("[Realtime] Session {} left {}", session, room);
        }
        removed
    }

    /// Remove `session` from every room and drop its queue.
    ///
    /// Returns the rooms it was in.
    pub async fn on_disconnect(&self, session: SessionId) -> Vec<DocumentId> {
        let mut inner = self.inner.write().await;
        inner.sessions.remove(&session);
        let rooms: Vec<DocumentId> = inner
            .joined
            .remove(&session)
            .map(|rooms| rooms.into_iter().collect())
            .unwrap_or_default();
        for room in &rooms {
            if let Some(members) = inner.rooms.get_mut(room) {
                members.remove(&session);
                if members.is_empty() {
                    inner.rooms.remove(room);
                }
            }
        }
        tracing::debug!(
            "[Realtime] Session {} disconnected from {} room(s)",
            session,
            rooms.len()
        );
        rooms
    }

    /// Sessions currently in `room`
    pub async fn members_of(&self, room: DocumentId) -> HashSet<SessionId> {
        self.inner
            .read()
            .await
            .rooms
            .get(&room)
            .cloned()
            .unwrap_or_default()
    }

    /// Rooms `session` is currently in
    pub async fn rooms_of(&self, session: SessionId) -> HashSet<DocumentId> {
        self.inner
            .read()
            .await
            .joined
            .get(&session)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn is_member(&self, session: SessionId, room: DocumentId) -> bool {
        self.inner
            .read()
            .await
            .rooms
            .get(&room)
            .is_some_and(|members| members.contains(&session))
    }

    /// Number of connected sessions
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// Remove every member of `room` whose user fails `keep`.
    ///
    /// Returns the evicted sessions with their queues. Members without a
    /// registered session are left alone.
    pub async fn evict_members<F>(&self, room: DocumentId, keep: F) -> Vec<(SessionId, SessionSender)>
    where
        F: Fn(UserId) -> bool,
    {
        let mut inner = self.inner.write().await;
        let Some(members) = inner.rooms.get(&room) else {
            return Vec::new();
        };
        let evicted: Vec<(SessionId, SessionSender)> = members
            .iter()
            .filter_map(|s| inner.sessions.get(s).map(|h| (*s, h)))
            .filter(|(_, handle)| !keep(handle.user))
            .map(|(s, handle)| (s, handle.sender.clone()))
            .collect();
        for (session, _) in &evicted {
            inner.remove_member(*session, room);
            tracing::info!("[Realtime] Session {} evicted from {}", session, room);
        }
        evicted
    }

    /// Queues of every member of `room` except `exclude`
    ///
    /// Members without a registered queue are skipped.
    pub(crate) async fn recipients(
        &self,
        room: DocumentId,
        exclude: SessionId,
    ) -> Vec<(SessionId, SessionSender)> {
        let inner = self.inner.read().await;
        let Some(members) = inner.rooms.get(&room) else {
            return Vec::new();
        };
        members
            .iter()
            .filter(|s| **s != exclude)
            .filter_map(|s| inner.sessions.get(s).map(|h| (*s, h.sender.clone())))
            .collect()
    }
}

impl Rooms {
    fn remove_member(&mut self, session: SessionId, room: DocumentId) -> bool {
        let removed = match self.rooms.get_mut(&room) {
            Some(members) => {
                let removed = members.remove(&session);
                if members.is_empty() {
                    self.rooms.remove(&room);
                }
                removed
            }
            None => false,
        };
        if let Some(rooms) = self.joined.get_mut(&session) {
            rooms.remove(&room);
            if rooms.is_empty() {
                self.joined.remove(&session);
            }
        }
        removed
    }
}
