/**
 * SMTP Notifier
 *
 * Delivers mail through an SMTP relay with `lettre`'s async transport on
 * the tokio runtime. The relay connection uses TLS and authenticates with
 * the configured credentials.
 */

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::backend::notify::{Mail, Notifier, NotifyError};

/// Notifier backed by an SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// Build a notifier for `host`, sending as `from`
    pub fn new(host: &str, username: &str, password: &str, from: &str) -> Result<Self, NotifyError> {
        let from: Mailbox = from
            .parse()
            .map_err(|e| NotifyError::Address(format!("{}: {}", from, e)))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        tracing::info!("[Notify] SMTP relay configured: {}", host);
        Ok(Self { transport, from })
    }

    fn build_message(&self, mail: Mail) -> Result<Message, NotifyError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| NotifyError::Address(format!("{}: {}", mail.to, e)))?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError> {
        let recipient = mail.to.clone();
        let message = self.build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        tracing::info!("[Notify] Mail sent to {}", recipient);
        Ok(())
    }
}
