//! Shared Module
//!
//! This module contains the types that cross the wire: document and identity
//! payloads returned by the HTTP API, share grants, and the realtime room
//! protocol spoken over the WebSocket. Nothing in here performs I/O.
//!
//! # Overview
//!
//! - **`identity`** - User identifiers and public user views
//! - **`document`** - Documents, file kinds and request payloads
//! - **`share`** - Share grants and per-user permissions
//! - **`event`** - Realtime room protocol (client and server events)
//! - **`error`** - Validation errors for wire payloads

/// User identifiers and public user views
pub mod identity;

/// Document model and request payloads
pub mod document;

/// Share grants
pub mod share;

/// Realtime room protocol
pub mod event;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use identity::{PublicUser, SharedUser, SharedUserRole, UserId};
pub use document::{Document, DocumentId, DocumentKind};
pub use share::{Permission, ShareGrant, SharedUserEntry};
pub use event::{ClientEvent, ServerEvent};
pub use error::SharedError;
