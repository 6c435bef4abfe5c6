//! Error handling utilities
//!
//! Run-level errors of the orchestrator. Executor failures are not represented here:
//! they are classified data (see `core::batch::ExecutionError`).

pub mod error;

pub use error::*;
