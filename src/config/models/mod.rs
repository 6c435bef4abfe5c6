//! Configuration data models

pub mod dispatch;
pub mod driver;
pub mod logging;
pub mod store;
pub mod worker_pool;

// Re-export all configuration types
pub use dispatch::*;
pub use driver::*;
pub use logging::*;
pub use store::*;
pub use worker_pool::*;

/// Default status store location
pub fn default_store_url() -> String {
    "sqlite://data/registry.db?mode=rwc".to_string()
}

/// Default maximum database connections
pub fn default_max_connections() -> u32 {
    5
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    30
}

/// Default in-flight request limit
pub fn default_max_concurrency() -> usize {
    10
}

pub fn default_requests_per_batch() -> u64 {
    1000
}

pub fn default_unit_size() -> usize {
    100
}

pub fn default_failure_rate_threshold() -> f64 {
    0.5
}

pub fn default_min_unit_size_for_rate_check() -> usize {
    5
}

/// Default backoff in seconds
pub fn default_backoff_secs() -> u64 {
    600 // 10 minutes
}

/// One parse worker per CPU
pub fn default_number_of_threads() -> usize {
    num_cpus::get()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
