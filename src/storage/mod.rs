//! Storage layer
//!
//! The status store is the single source of truth for resumability.

/// Database storage module
pub mod database;

pub use database::{
    IdentifierStatus, InsertSummary, PendingRecord, StatusStore, StatusUpdate, StoreStats,
};
