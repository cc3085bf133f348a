//! Documents Module
//!
//! This module implements the document management surface: CRUD, import,
//! duplication, collaborator management, public visibility, invitations,
//! share-by-email and share grants.
//!
//! # Architecture
//!
//! - **`service`** - `DocumentService`, which loads a document, asks
//!   `access` what the caller may do, and writes the result back with a
//!   single store call
//! - **`types`** - request and response payloads
//! - **`handlers`** - axum handlers mounted under `/api/documents`
//!
//! # Module Structure
//!
//! ```text
//! documents/
//! ├── mod.rs       - Module exports and documentation
//! ├── service.rs   - Access-gated document operations
//! ├── types.rs     - Request/response types
//! └── handlers.rs  - HTTP handlers
//! ```
//!
//! # Denials
//!
//! A caller who cannot view a document gets the same 404 as for a missing
//! one. A caller who can view but not edit or delete also gets 404 from
//! update and delete. Management operations (collaborators, visibility,
//! invitations, share mails, share grants) answer 403 to viewers that are
//! not the owner.

/// Access-gated document operations
pub mod service;

/// Request and response types
pub mod types;

/// HTTP handlers
pub mod handlers;

pub use service::DocumentService;
