//! Test store utilities
//!
//! Each test gets an isolated in-memory SQLite status store.

use registry_batch::config::StoreConfig;
use registry_batch::storage::database::{IdentifierStatus, StatusStore};
use std::sync::Arc;

/// Test store wrapper providing isolated in-memory instances
#[derive(Debug, Clone)]
pub struct TestStore {
    inner: Arc<StatusStore>,
}

impl TestStore {
    /// Create a new migrated in-memory store
    pub async fn new() -> Self {
        let store = StatusStore::open(&StoreConfig::in_memory())
            .await
            .expect("Failed to create in-memory status store");

        Self {
            inner: Arc::new(store),
        }
    }

    /// Get reference to the underlying store
    pub fn store(&self) -> &StatusStore {
        &self.inner
    }

    /// Get Arc to the underlying store
    pub fn store_arc(&self) -> Arc<StatusStore> {
        Arc::clone(&self.inner)
    }

    /// Status of `key`, panicking if it was never ingested
    pub async fn status(&self, key: &str) -> IdentifierStatus {
        self.inner
            .status_of(key)
            .await
            .expect("status query failed")
            .unwrap_or_else(|| panic!("{} was never ingested", key))
    }
}
