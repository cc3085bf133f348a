//! Integration tests against the real router

mod database;
mod realtime;
