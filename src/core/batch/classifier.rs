//! Failure classification
//!
//! Executors own source-specific knowledge and report it through [`ExecutionError`];
//! everything downstream only sees a [`Classification`].

use serde_json::Value;

use super::types::ExecutionError;

/// Classified outcome of one settled item
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Success(Value),
    Retryable(String),
    ValidationInvalid(String),
    FatalStop(String),
}

impl Classification {
    pub fn is_success(&self) -> bool {
        matches!(self, Classification::Success(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Classification::FatalStop(_))
    }
}

/// Map an execution result to its classification
pub fn classify(result: Result<Value, ExecutionError>) -> Classification {
    match result {
        Ok(payload) => Classification::Success(payload),
        Err(ExecutionError::Retryable(reason)) => Classification::Retryable(reason),
        Err(ExecutionError::Validation(reason)) => Classification::ValidationInvalid(reason),
        Err(ExecutionError::Fatal(reason)) => Classification::FatalStop(reason),
        // A crashed parse is not the identifier's fault; it gets another chance next run
        Err(crash @ ExecutionError::WorkerCrashed { .. }) => {
            Classification::Retryable(crash.to_string())
        }
    }
}
