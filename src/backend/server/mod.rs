//! Server Module
//!
//! This module contains the code that assembles the Axum server: runtime
//! configuration, the shared application state, and startup.
//!
//! # Architecture
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Configuration loading and the optional database pool
//! - **`init`** - Backend selection and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - ServerConfig, environment, database
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env()`
//! 2. **Backends**: PostgreSQL or memory store, SMTP or logging notifier
//! 3. **State Creation**: stores, document service, auth gate, realtime registry
//! 4. **Router Creation**: routes, CORS and tracing layers
//!
//! # Example
//!
//! ```rust,no_run
//! use editsync::backend::server::{create_app, config::ServerConfig};
//!
//! # async fn example() {
//! let app = create_app(ServerConfig::from_env()).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

/// Application state
pub mod state;

/// Configuration
pub mod config;

/// Initialization
pub mod init;

pub use config::ServerConfig;
pub use init::{build_state, create_app};
pub use state::AppState;
