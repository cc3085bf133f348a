//! End-to-end scenarios across HTTP and realtime

mod app_suite;
