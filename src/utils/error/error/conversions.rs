//! Type conversions for OrchestratorError

use super::types::OrchestratorError;

impl From<tokio::task::JoinError> for OrchestratorError {
    fn from(err: tokio::task::JoinError) -> Self {
        OrchestratorError::Internal(format!("Background task failed: {}", err))
    }
}
