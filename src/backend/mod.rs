//! Backend Module
//!
//! This module contains all server-side code for EditSync: an Axum HTTP
//! server that authenticates users, stores documents with an owner and a
//! collaborator list, and relays realtime edit events between the clients
//! that have the same document open.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Users, password hashing, tokens, auth endpoints
//! - **`middleware`** - Credential resolution (`AuthGate`) and the auth layer
//! - **`access`** - The view/edit/manage/delete decisions
//! - **`documents`** - Access-gated document operations and handlers
//! - **`collab`** - Realtime rooms over WebSocket
//! - **`store`** - Persistence capabilities, memory and PostgreSQL backends
//! - **`notify`** - Outbound mail
//! - **`error`** - Backend error taxonomy and HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── access/         - Access rules
//! ├── documents/      - Document management
//! ├── collab/         - Realtime collaboration
//! ├── store/          - Persistence
//! ├── notify/         - Mail
//! └── error/          - Error types
//! ```
//!
//! # Access Control
//!
//! Every document read or write, over HTTP or the realtime socket, goes
//! through `access::rules`. A document the caller may not view is reported
//! as missing.
//!
//! # Thread Safety
//!
//! - Stores are `Arc<dyn ...>` capability objects; the memory store and the
//!   session registry guard their maps with `tokio::sync::RwLock`
//! - Each realtime session owns a bounded `tokio::sync::mpsc` queue
//! - Axum handlers are `Send + Sync`

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Document access rules
pub mod access;

/// Document management
pub mod documents;

/// Realtime collaboration rooms
pub mod collab;

/// Persistence
pub mod store;

/// Outbound mail
pub mod notify;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
