//! Batch driver configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Slicing and failure-rate rules of the batch driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Pending keys read from the store per slice
    #[serde(default = "default_requests_per_batch")]
    pub requests_per_batch: u64,
    /// Items per dispatch unit
    #[serde(default = "default_unit_size")]
    pub unit_size: usize,
    /// Failure rate above which a unit breaches
    #[serde(default = "default_failure_rate_threshold")]
    pub failure_rate_threshold: f64,
    /// Units of this size or smaller are not rate-checked
    #[serde(default = "default_min_unit_size_for_rate_check")]
    pub min_unit_size_for_rate_check: usize,
    /// Pause after the first breaching unit, in seconds
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
    /// Re-fetch identifiers even when a payload exists
    #[serde(default)]
    pub update_mode: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            requests_per_batch: default_requests_per_batch(),
            unit_size: default_unit_size(),
            failure_rate_threshold: default_failure_rate_threshold(),
            min_unit_size_for_rate_check: default_min_unit_size_for_rate_check(),
            backoff_secs: default_backoff_secs(),
            update_mode: false,
        }
    }
}

impl DriverConfig {
    pub fn backoff_duration(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }
}
