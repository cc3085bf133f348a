//! PostgreSQL store integration tests
