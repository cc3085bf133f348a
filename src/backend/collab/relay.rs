/**
 * Change Relay
 *
 * Fans one `document-change` out to the other members of a room as a
 * `document-update` carrying the same payload. Each recipient gets its copy
 * through a non-blocking `try_send` on its own queue, so a slow or gone
 * recipient costs the others nothing. Failed deliveries are logged and
 * counted, never reported to the sender.
 */

use serde_json::Value;
use tokio::sync::mpsc::error::TrySendError;

use crate::backend::collab::registry::{SessionId, SessionRegistry};
use crate::shared::{DocumentId, ServerEvent};

/// What happened to one relayed change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    pub delivered: usize,
    pub dropped: usize,
}

/// Room fan-out over a `SessionRegistry`
#[derive(Debug, Clone)]
pub struct ChangeRelay {
    registry: SessionRegistry,
}

impl ChangeRelay {
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Deliver `payload` to every member of `room` except `sender`
    pub async fn relay_change(
        &self,
        sender: SessionId,
        room: DocumentId,
        payload: Value,
    ) -> RelayOutcome {
        let mut outcome = RelayOutcome::default();
        let recipients = self.registry.recipients(room, sender).await;

        for (session, queue) in recipients {
            match queue.try_send(ServerEvent::DocumentUpdate(payload.clone())) {
                Ok(()) => outcome.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    outcome.dropped += 1;
                    tracing::warn!("[Realtime] Queue full, dropped update for {} in {}", session, room);
                }
                Err(TrySendError::Closed(_)) => {
                    outcome.dropped += 1;
                    tracing::debug!("[Realtime] Session {} gone, dropped update in {}", session, room);
                }
            }
        }

        tracing::debug!(
            "[Realtime] Relayed change from {} in {}: {} delivered, {} dropped",
            sender,
            room,
            outcome.delivered,
            outcome.dropped
        );
        outcome
    }
}
