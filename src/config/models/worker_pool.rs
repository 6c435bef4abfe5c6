//! Worker pool configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Parse worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPoolConfig {
    /// Upper bound of live worker threads
    #[serde(default = "default_number_of_threads")]
    pub number_of_threads: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            number_of_threads: default_number_of_threads(),
        }
    }
}
