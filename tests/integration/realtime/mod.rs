//! Realtime integration tests

mod socket_test;
