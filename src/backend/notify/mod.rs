//! Notification Module
//!
//! This module sends outbound mail on behalf of the backend: the welcome mail
//! after registration, the password reset link, and "shared a document with
//! you" mails.
//!
//! # Architecture
//!
//! - **`Notifier`** - capability trait held as `Arc<dyn Notifier>` in `AppState`
//! - **`smtp`** - `SmtpNotifier`, delivery through `lettre`
//! - **`LogNotifier`** - logs the mail and succeeds; used when SMTP is not configured
//! - **`templates`** - subject and HTML body builders
//!
//! # Failure policy
//!
//! Callers decide whether a failed send matters. Registration logs and moves
//! on; the reset and share-by-email endpoints surface it as a delivery error.

use async_trait::async_trait;
use thiserror::Error;

/// SMTP delivery
pub mod smtp;

/// Mail templates
pub mod templates;

pub use smtp::SmtpNotifier;

/// A composed mail ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Errors raised while sending mail
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Sender or recipient address could not be parsed
    #[error("Invalid address: {0}")]
    Address(String),

    /// The message could not be assembled
    #[error("Failed to build message: {0}")]
    Build(String),

    /// The transport rejected or failed to deliver the message
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Outbound mail capability
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError>;
}

/// Notifier that only logs
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError> {
        tracing::info!(
            "[Notify] SMTP not configured, not sending \"{}\" to {}",
            mail.subject,
            mail.to
        );
        tracing::debug!("[Notify] Body: {}", mail.html);
        Ok(())
    }
}
