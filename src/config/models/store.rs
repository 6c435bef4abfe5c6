//! Status store configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Status store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database URL (`sqlite://...` or `sqlite::memory:`)
    #[serde(default = "default_store_url")]
    pub url: String,
    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Drop stored payloads too when new input resets the store
    #[serde(default)]
    pub clear_payloads_on_reset: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
            clear_payloads_on_reset: false,
        }
    }
}

impl StoreConfig {
    /// Private in-memory SQLite store
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}
