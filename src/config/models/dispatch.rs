//! Request dispatch configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied by the bounded dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum in-flight requests
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Maximum requests started per second; unlimited when absent
    #[serde(default)]
    pub requests_per_second: Option<u32>,
    /// Starts allowed back to back before the rate applies
    #[serde(default)]
    pub burst: Option<u32>,
    /// Per-request timeout in milliseconds
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            requests_per_second: None,
            burst: None,
            request_timeout_ms: None,
        }
    }
}

impl DispatchConfig {
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_requests_per_second(mut self, rate: u32) -> Self {
        self.requests_per_second = Some(rate);
        self
    }

    pub fn with_burst(mut self, burst: u32) -> Self {
        self.burst = Some(burst);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
