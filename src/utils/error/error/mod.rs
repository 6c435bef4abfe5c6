//! Error handling for the orchestrator
//!
//! This module defines the run-level error types used throughout the crate.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod types;

pub use types::{OrchestratorError, Result};
