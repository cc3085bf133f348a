/**
 * Error Conversion
 *
 * This module is the boundary translator: every handler returns
 * `Result<_, BackendError>` and axum renders the error through the
 * `IntoResponse` implementation below.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 404
 * }
 * ```
 *
 * Concealed and genuine "not found" errors render identically; only the log
 * line tells them apart.
 */

use axum::{
    response::{IntoResponse, Json, Response},
};
use crate::backend::error::types::{BackendError, NotFoundCause};

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        match &self {
            BackendError::NotFound { cause: NotFoundCause::AccessDenied, message } => {
                tracing::info!("[Error] Access denied, reported as not found: {}", message);
            }
            BackendError::Store(err) => {
                tracing::error!("[Error] Store failure: {:?}", err);
            }
            BackendError::Internal { message } | BackendError::Delivery { message } => {
                tracing::error!("[Error] {}", message);
            }
            other => {
                tracing::debug!("[Error] {} -> {}", other, status);
            }
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
