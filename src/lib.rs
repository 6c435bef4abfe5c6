//! # registry-batch
//!
//! Resumable batch orchestration for bulk registry lookups.
//!
//! Identifiers are ingested into a durable status store, sliced into dispatch
//! units, settled through a bounded async dispatcher or a parse worker pool, and
//! written back unit by unit. A run can stop at any point and the next run picks up
//! where it left off.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use registry_batch::{
//!     BatchDriver, BoundedDispatcher, Config, ExecutionError, MemoryInputSource, StatusStore,
//!     WorkItem,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(StatusStore::open(&config.store).await?);
//!
//!     let executor = |item: WorkItem| async move {
//!         // Call the registry here
//!         Ok::<_, ExecutionError>(json!({ "id": item.key }))
//!     };
//!     let dispatcher = Arc::new(BoundedDispatcher::new(executor, config.dispatch.clone()));
//!
//!     let driver = BatchDriver::new(store, dispatcher, config.driver.clone());
//!     let report = driver
//!         .run(&mut MemoryInputSource::new(["12.345.678/0001-90"]))
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{OrchestratorError, Result};

pub use core::batch::{
    BatchDriver, BoundedDispatcher, Classification, Dispatch, DispatchOutcome, ExecutionError,
    FieldExtractor, FieldProjection, PassThroughExtractor, PoolEvent, RequestExecutor, RunOutcome,
    RunReport, WorkItem, WorkerPool, classify,
};
pub use core::ingest::{
    DefaultStrategy, FileInputSource, InputSource, MemoryInputSource, SourceStrategy,
    normalize_identifier, parse_line,
};
pub use storage::{IdentifierStatus, StatusStore, StoreStats};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build information
#[derive(Debug, Clone, serde::Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the epoch
    pub build_time: &'static str,
    pub git_hash: &'static str,
    pub rust_version: &'static str,
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION,
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
    }
}
