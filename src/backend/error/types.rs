/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the backend. Errors are raised
 * where they are detected and travel up with `?` to a single boundary,
 * `conversion`, which maps each kind to a fixed status code.
 *
 * # Error Categories
 *
 * - `Unauthenticated` - missing, malformed or unknown credential (401)
 * - `InvalidCredentials` - login with a wrong email or password (401)
 * - `Forbidden` - authenticated but not allowed (403)
 * - `NotFound` - absent, or concealed because access was denied (404)
 * - `SharedError` - malformed input (400)
 * - `InvalidOperation` - well-formed request that breaks an invariant (400)
 * - `Conflict` - duplicate email (409)
 * - `Delivery` - a notification could not be sent (500)
 * - `Store` / `Internal` - collaborator failures (500)
 *
 * # Concealed denials
 *
 * Document operations answer "not found" both when the document is absent
 * and when the caller may not see it, so that ids cannot be enumerated. The
 * `NotFoundCause` keeps the distinction for logging.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;
use crate::backend::store::StoreError;

/// Why a `NotFound` was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundCause {
    /// The resource does not exist
    Missing,
    /// The resource exists but the caller lacks access
    AccessDenied,
}

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// No valid credential on the request
    #[error("Please authenticate")]
    Unauthenticated,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The caller is known but lacks permission
    #[error("{message}")]
    Forbidden {
        message: String,
    },

    /// The resource is absent, or hidden from the caller
    #[error("{message}")]
    NotFound {
        message: String,
        cause: NotFoundCause,
    },

    /// Malformed input
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// The request would break a document invariant
    #[error("{message}")]
    InvalidOperation {
        message: String,
    },

    /// Duplicate unique value
    #[error("{message}")]
    Conflict {
        message: String,
    },

    /// Notification delivery failed
    #[error("{message}")]
    Delivery {
        message: String,
    },

    /// Store collaborator failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Anything else that is the server's fault
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl BackendError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Resource that genuinely does not exist
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            cause: NotFoundCause::Missing,
        }
    }

    /// Resource that exists but is hidden from the caller
    pub fn concealed(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            cause: NotFoundCause::AccessDenied,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SharedError(SharedError::validation(field, message))
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::UnsupportedKind { .. } => StatusCode::BAD_REQUEST,
            },
            Self::InvalidOperation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Delivery { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(StoreError::DuplicateEmail(_)) => StatusCode::CONFLICT,
            Self::Store(StoreError::VersionConflict(_)) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing message
    ///
    /// Store and internal failures are reported generically.
    pub fn message(&self) -> String {
        match self {
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::Store(StoreError::DuplicateEmail(_)) => "Email already in use".to_string(),
            Self::Store(StoreError::VersionConflict(_)) => {
                "Document was modified concurrently, please retry".to_string()
            }
            Self::Store(_) | Self::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}
