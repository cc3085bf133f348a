//! Property-based tests

mod access_proptest;
