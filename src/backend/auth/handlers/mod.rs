//! Authentication Handlers Module
//!
//! This module contains the HTTP handlers of the identity surface.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - POST /api/auth/register
//! ├── login.rs     - POST /api/auth/login
//! ├── reset.rs     - POST /api/auth/request-reset, /api/auth/reset-password
//! └── profile.rs   - /api/users/me, /api/users/search, /api/users/{id}
//! ```
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs; lifetime comes from `TOKEN_TTL_HOURS`
//! - Invalid credentials return 401 without saying which part was wrong

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Password reset handlers
pub mod reset;

/// Profile and user lookup handlers
pub mod profile;

pub use types::{AuthResponse, LoginRequest, RegisterRequest};

pub use login::login;
pub use profile::{delete_me, get_me, get_user, search_users, update_me};
pub use register::register;
pub use reset::{request_reset, reset_password};
