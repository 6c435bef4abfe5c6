//! Configuration management
//!
//! Configuration is read from YAML, optionally overridden from environment
//! variables, and validated before use.

mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{OrchestratorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Status store
    pub store: StoreConfig,
    /// Async request dispatch limits
    pub dispatch: DispatchConfig,
    /// Batch driver rules
    pub driver: DriverConfig,
    /// Parse worker pool
    pub worker_pool: WorkerPoolConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| OrchestratorError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| OrchestratorError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults plus environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self::default().with_env_overrides(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, then apply environment overrides
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.store
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Store config error: {}", e)))?;
        self.dispatch
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Dispatch config error: {}", e)))?;
        self.driver
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Driver config error: {}", e)))?;
        self.worker_pool
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Worker pool config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| OrchestratorError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_config_from_file() {
        let config_content = r#"
store:
  url: "sqlite::memory:"
dispatch:
  max_concurrency: 4
  requests_per_second: 20
driver:
  unit_size: 50
  backoff_secs: 120
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.store.url, "sqlite::memory:");
        assert_eq!(config.dispatch.max_concurrency, 4);
        assert_eq!(config.dispatch.requests_per_second, Some(20));
        assert_eq!(config.driver.unit_size, 50);
        assert_eq!(config.driver.requests_per_batch, 1000);
        assert_eq!(config.driver.failure_rate_threshold, 0.5);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.url, "sqlite://data/registry.db?mode=rwc");
        assert_eq!(config.driver.min_unit_size_for_rate_check, 5);
        assert_eq!(config.driver.backoff_secs, 600);
        assert!(!config.driver.update_mode);
        assert_eq!(config.worker_pool.number_of_threads, num_cpus::get());
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = Config::from_yaml("driver:\n  unit_size: [1, 2]\n").unwrap_err();
        assert!(matches!(err, OrchestratorError::Config(_)));
    }

    #[test]
    fn test_validation_rejects_zero_unit_size() {
        let err = Config::from_yaml("driver:\n  unit_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("unit_size"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
    }
}
