/**
 * Server Initialization
 *
 * This module builds `AppState` from `ServerConfig` and hands it to the
 * router.
 *
 * # Initialization Process
 *
 * 1. Pick the notifier: SMTP when configured and valid, logging otherwise
 * 2. Pick the store: PostgreSQL when `DATABASE_URL` connects, memory otherwise
 * 3. Build the state and the router
 *
 * Both fallbacks are logged and never prevent startup.
 */

use axum::Router;
use std::sync::Arc;

use crate::backend::notify::{LogNotifier, Notifier, SmtpNotifier};
use crate::backend::routes::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::PgStore;

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing EditSync backend server");
    let state = build_state(config).await;
    create_router(state)
}

/// Build the application state, choosing backends from `config`
pub async fn build_state(config: ServerConfig) -> AppState {
    let notifier = build_notifier(&config);

    let pool = match config.database_url.as_deref() {
        Some(url) => load_database(url).await,
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-memory store; data is lost on restart.");
            None
        }
    };

    match pool {
        Some(pool) => {
            tracing::info!("Using PostgreSQL store");
            AppState::postgres(config, PgStore::new(pool), notifier)
        }
        None => AppState::in_memory(config, notifier),
    }
}

fn build_notifier(config: &ServerConfig) -> Arc<dyn Notifier> {
    let Some(smtp) = &config.smtp else {
        tracing::warn!("SMTP not configured. Outbound mail will only be logged.");
        return Arc::new(LogNotifier);
    };

    match SmtpNotifier::new(&smtp.host, &smtp.username, &smtp.password, &smtp.from) {
        Ok(notifier) => {
            tracing::info!("Mail delivery through {}", smtp.host);
            Arc::new(notifier)
        }
        Err(e) => {
            tracing::error!("Failed to configure SMTP: {}", e);
            Arc::new(LogNotifier)
        }
    }
}
