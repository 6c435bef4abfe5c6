//! Utility modules
//!
//! - **error**: Error type and conversions
//! - **logging**: Tracing subscriber setup

pub mod error; // Error handling
pub mod logging; // Logging

pub use error::{OrchestratorError, Result};
pub use logging::init_tracing;
