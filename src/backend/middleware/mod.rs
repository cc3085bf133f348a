//! Middleware Module
//!
//! This module contains the HTTP middleware of the backend server.
//!
//! # Architecture
//!
//! - **`auth`** - `AuthGate`, which turns a bearer credential into an
//!   identity, the middleware that applies it to protected routes, and the
//!   `AuthUser` extractor handlers use to read the result
//!
//! # Example
//!
//! ```rust,no_run
//! use editsync::backend::middleware::auth_middleware;
//!
//! // let protected = router.route_layer(
//! //     axum::middleware::from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;

pub use auth::{auth_middleware, bearer_token, AuthGate, AuthUser, AuthenticatedUser};
