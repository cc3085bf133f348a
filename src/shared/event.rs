/**
 * Realtime Room Protocol
 *
 * This module defines the events exchanged over the realtime WebSocket.
 * Every text frame is a JSON object of the form
 * `{"event": "<name>", "data": <payload>}`.
 *
 * # Client events
 *
 * - `join-document` - data is the document id
 * - `leave-document` - data is the document id
 * - `document-change` - data is `{"documentId": ..., "changes": ...}`
 *
 * # Server events
 *
 * - `document-update` - data is the sender's `changes`, verbatim
 * - `error` - data is `{"message": ...}`
 *
 * The `changes` payload is opaque: the server never inspects or merges it.
 */
use serde::{Deserialize, Serialize};

/// Event sent by a client over the realtime socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join the room of a document
    JoinDocument(String),
    /// Leave the room of a document
    LeaveDocument(String),
    /// Relay changes to the other members of a room
    DocumentChange(DocumentChange),
}

/// Payload of a `document-change` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChange {
    pub document_id: String,
    #[serde(default)]
    pub changes: serde_json::Value,
}

/// Event sent by the server over the realtime socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Changes emitted by another member of the room
    DocumentUpdate(serde_json::Value),
    /// A client event was rejected
    Error(ErrorPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl ServerEvent {
    /// Create an error event
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            message: message.into(),
        })
    }
}
