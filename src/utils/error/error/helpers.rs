//! Helper functions for creating specific error types

use super::types::OrchestratorError;

/// Helper functions for creating specific errors
impl OrchestratorError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn ingestion<S: Into<String>>(message: S) -> Self {
        Self::Ingestion(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the error must end the current run.
    ///
    /// Storage faults always do: progress already persisted stays resumable, but
    /// nothing further can be recorded.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_)
        )
    }

    /// Short machine-readable code for reports and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
            Self::Io(_) => "io",
            Self::Ingestion(_) => "ingestion",
            Self::Validation(_) => "validation",
            Self::PoolClosed => "pool_closed",
            Self::Internal(_) => "internal",
        }
    }
}
