//! Common test utilities for registry-batch
//!
//! - In-memory SQLite status stores
//! - Scripted executors and input files

pub mod database;
pub mod fixtures;

// Re-export commonly used items
pub use database::TestStore;
pub use fixtures::{ScriptedExecutor, input_file, numbered_keys};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
