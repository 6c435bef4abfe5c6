//! Error types for the orchestrator

use thiserror::Error;

/// Result type alias for the orchestrator
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Main error type for run-level failures
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistence-layer faults of the status store
    #[error("Storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input could not be ingested
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The worker pool no longer accepts submissions
    #[error("Worker pool is closed")]
    PoolClosed,

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
