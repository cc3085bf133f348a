//! In-memory application fixture
//!
//! `TestApp` runs the real router over a fresh `MemoryStore` and a
//! `RecordingNotifier`, on a real HTTP transport so WebSocket tests work.

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use editsync::backend::notify::{Mail, Notifier, NotifyError};
use editsync::backend::routes::create_router;
use editsync::backend::server::{AppState, ServerConfig};

/// Notifier that keeps every mail it is asked to send
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Mail>>>,
    failing: Arc<AtomicBool>,
    stalling: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub async fn sent(&self) -> Vec<Mail> {
        self.sent.lock().await.clone()
    }

    /// Wait for a mail to `to` whose subject contains `subject`
    ///
    /// Some mail is sent from a background task, so the recording may land
    /// after the response that triggered it.
    pub async fn wait_for(&self, to: &str, subject: &str) -> Mail {
        let find = async {
            loop {
                let found = self
                    .sent
                    .lock()
                    .await
                    .iter()
                    .rev()
                    .find(|m| m.to == to && m.subject.contains(subject))
                    .cloned();
                if let Some(mail) = found {
                    return mail;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(2), find)
            .await
            .unwrap_or_else(|_| panic!("no mail {:?} sent to {}", subject, to))
    }

    /// Make every later send fail with a transport error
    pub fn fail_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Make every later send hang forever, like an unresponsive relay
    pub fn stall_deliveries(&self) {
        self.stalling.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError> {
        if self.stalling.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Transport("connection refused".into()));
        }
        self.sent.lock().await.push(mail);
        Ok(())
    }
}

/// Configuration with a cheap bcrypt cost
pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: "integration-test-secret".into(),
        frontend_url: "http://app.test".into(),
        session_queue_capacity: 16,
        bcrypt_cost: 4,
        ..ServerConfig::default()
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub mail: RecordingNotifier,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let mail = RecordingNotifier::default();
        let state = AppState::in_memory(config, Arc::new(mail.clone()));
        let server = TestServer::builder()
            .http_transport()
            .build(create_router(state.clone()))
            .expect("Failed to start test server");
        Self {
            server,
            state,
            mail,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
