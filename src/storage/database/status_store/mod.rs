// Module declarations
mod connection;
mod identifier_ops;
mod result_ops;
mod stats_ops;
mod types;


// Re-export public types
pub use types::{
    IdentifierStatus, InsertSummary, PendingRecord, StatusStore, StatusUpdate, StoreStats,
};
