//! EditSync - Main Library
//!
//! EditSync is a collaborative document-editing backend. It authenticates
//! users, stores documents with ownership and collaborator lists, and relays
//! realtime edit events between connected clients editing the same document.
//!
//! # Module Structure
//!
//! - **`shared`** - Types that cross the wire
//!   - Documents, identities, share grants
//!   - The realtime room protocol
//!   - Validation errors
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server and WebSocket endpoint
//!   - Authentication, access control, document management
//!   - Memory and PostgreSQL stores, SMTP mail
//!
//! # Usage
//!
//! ```rust,no_run
//! use editsync::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() {
//! let app = create_app(ServerConfig::from_env()).await;
//! // Use app with axum::serve
//! # }
//! ```
//!
//! # Realtime Model
//!
//! Edits are opaque JSON relayed to the other members of a document's room.
//! The server does not merge or persist them; clients persist document
//! content through the HTTP API.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
