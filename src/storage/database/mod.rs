//! Database storage implementation using SeaORM

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// Identifier status store
pub mod status_store;

pub use status_store::{
    IdentifierStatus, InsertSummary, PendingRecord, StatusStore, StatusUpdate, StoreStats,
};
