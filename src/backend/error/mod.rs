//! Backend Error Module
//!
//! This module defines the error taxonomy of the backend and its translation
//! into HTTP responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError`, `NotFoundCause` and constructors
//! - **`conversion`** - `IntoResponse` for `BackendError`
//!
//! # Example
//!
//! ```rust,no_run
//! use editsync::backend::error::BackendError;
//!
//! fn lookup(found: bool) -> Result<(), BackendError> {
//!     if !found {
//!         return Err(BackendError::not_found("Document not found"));
//!     }
//!     Ok(())
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, NotFoundCause};
