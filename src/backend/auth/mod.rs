//! Authentication Module
//!
//! This module handles registration, login, password reset and profile
//! management, and owns the user record and token mechanics.
//!
//! # Architecture
//!
//! - **`users`** - User record, password hashing, reset tokens, placeholders
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - HTTP handlers for `/api/auth` and `/api/users`
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and credential helpers
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email, password, name → user created (or placeholder claimed) → token returned
//! 2. **Login**: email and password → credentials verified → token returned
//! 3. **Protected routes**: `Authorization: Bearer <token>` → `AuthGate` → handler
//!
//! # Placeholder identities
//!
//! Inviting an unknown email to a document creates an identity without a
//! password. It cannot log in; registering with that email later claims it.

/// User data model and credential helpers
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, RegisterRequest};
pub use sessions::SessionKeys;
pub use users::User;
