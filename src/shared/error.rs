//! Shared Error Types
//!
//! This module defines errors raised while validating wire payloads before
//! they reach the document service or the identity handlers.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - A field failed validation
//! - `UnsupportedKind` - A file kind outside the accepted set
//!
//! # Usage
//!
//! ```rust
//! use editsync::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Invalid email format");
//! ```
use thiserror::Error;

/// Errors raised while validating shared payloads
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// File kind outside the accepted set
    #[error("Unsupported file type: {kind}")]
    UnsupportedKind {
        /// The kind that was supplied
        kind: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unsupported kind error
    pub fn unsupported_kind(kind: impl Into<String>) -> Self {
        Self::UnsupportedKind { kind: kind.into() }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Check that an email has the `local@domain.tld` shape.
///
/// Whitespace anywhere, a missing local part, or a domain without an inner dot
/// are all rejected.
pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let invalid = || SharedError::validation("email", "Invalid email format");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
