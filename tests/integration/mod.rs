//! Integration tests for registry-batch
//!
//! These tests drive the public API against real in-memory SQLite stores.

pub mod config_tests;
pub mod driver_tests;
pub mod store_tests;
pub mod worker_pool_tests;
