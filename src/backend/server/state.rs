/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - Configuration
 * - The user store and the notifier, as capability objects
 * - `DocumentService`, the access-gated document operations
 * - `AuthGate`, credential resolution
 * - The realtime session registry and change relay
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and shares its data through `Arc`. Stores
 * and the session registry guard their own maps with `tokio::sync::RwLock`.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract only the part they
 * need, e.g. `State<DocumentService>` or `State<AuthGate>`.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::SessionKeys;
use crate::backend::collab::{ChangeRelay, SessionRegistry};
use crate::backend::documents::DocumentService;
use crate::backend::middleware::AuthGate;
use crate::backend::notify::Notifier;
use crate::backend::server::config::ServerConfig;
use crate::backend::store::{DocumentStore, MemoryStore, PgStore, ShareGrantStore, UserStore};

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub users: Arc<dyn UserStore>,
    pub notifier: Arc<dyn Notifier>,
    pub documents: DocumentService,
    pub auth: AuthGate,
    pub registry: SessionRegistry,
    pub relay: ChangeRelay,
}

impl AppState {
    /// Wire the state from individual store capabilities
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        documents: Arc<dyn DocumentStore>,
        grants: Arc<dyn ShareGrantStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let keys = SessionKeys::new(
            &config.jwt_secret,
            chrono::Duration::hours(config.token_ttl_hours),
        );
        let registry = SessionRegistry::new();

        Self {
            auth: AuthGate::new(keys, users.clone()),
            documents: DocumentService::new(documents, grants, users.clone(), notifier.clone()),
            relay: ChangeRelay::new(registry.clone()),
            registry,
            users,
            notifier,
            config: Arc::new(config),
        }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(config: ServerConfig, notifier: Arc<dyn Notifier>) -> Self {
        let store = MemoryStore::new();
        Self::new(
            config,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            notifier,
        )
    }

    /// State backed by PostgreSQL
    pub fn postgres(config: ServerConfig, store: PgStore, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            config,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            notifier,
        )
    }
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for DocumentService {
    fn from_ref(state: &AppState) -> Self {
        state.documents.clone()
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}

impl FromRef<AppState> for ChangeRelay {
    fn from_ref(state: &AppState) -> Self {
        state.relay.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
