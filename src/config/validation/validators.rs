//! Section validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Validate for StoreConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating store configuration");

        if self.url.is_empty() {
            return Err("Store URL cannot be empty".to_string());
        }

        if !self.url.starts_with("sqlite:")
            && !self.url.starts_with("postgres://")
            && !self.url.starts_with("postgresql://")
        {
            return Err("Store URL must be a sqlite or postgres URL".to_string());
        }

        if self.max_connections == 0 {
            return Err("Store max connections must be greater than 0".to_string());
        }

        if self.connection_timeout == 0 {
            return Err("Store connection timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for DispatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }

        if self.requests_per_second == Some(0) {
            return Err("requests_per_second must be greater than 0 when set".to_string());
        }

        if self.burst == Some(0) {
            return Err("burst must be greater than 0 when set".to_string());
        }

        if self.request_timeout_ms == Some(0) {
            return Err("request_timeout_ms must be greater than 0 when set".to_string());
        }

        Ok(())
    }
}

impl Validate for DriverConfig {
    fn validate(&self) -> Result<(), String> {
        if self.requests_per_batch == 0 {
            return Err("requests_per_batch must be greater than 0".to_string());
        }

        if self.unit_size == 0 {
            return Err("unit_size must be greater than 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.failure_rate_threshold) {
            return Err("failure_rate_threshold must be between 0 and 1".to_string());
        }

        Ok(())
    }
}

impl Validate for WorkerPoolConfig {
    fn validate(&self) -> Result<(), String> {
        if self.number_of_threads == 0 {
            return Err("number_of_threads must be greater than 0".to_string());
        }

        if self.number_of_threads > 1024 {
            return Err("number_of_threads should not exceed 1024".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        // Full filter directives ("registry_batch=debug,sea_orm=warn") are passed through
        if !self.level.contains('=') && !LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!("Unknown log level '{}'", self.level));
        }

        Ok(())
    }
}
