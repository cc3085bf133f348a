//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, middleware layers and fallback
//! - **`api_routes`** - JSON API: auth, users, documents
//! - **`collab_routes`** - Realtime WebSocket endpoint
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs            - Module exports and documentation
//! ├── router.rs         - Main router creation
//! ├── api_routes.rs     - API endpoint handlers
//! └── collab_routes.rs  - Realtime endpoint
//! ```
//!
//! # Route Types
//!
//! ## Public
//!
//! - `GET /api/health`
//! - `POST /api/auth/register`, `/login`, `/request-reset`, `/reset-password`
//! - `GET /ws` (authenticates its own credential before upgrading)
//!
//! ## Protected (bearer token)
//!
//! - `/api/users/...` - profile and user lookup
//! - `/api/documents/...` - document management and sharing

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

/// Realtime endpoint
pub mod collab_routes;

pub use router::create_router;
