//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-memory application behind an `axum-test` server
//! - A notifier that records outbound mail
//! - Authentication helpers
//! - Database fixtures for the PostgreSQL store
//! - Custom assertion macros

pub mod app;

// Re-export commonly used utilities
pub use app::*;
pub use auth_helpers::*;
pub use database::*;
