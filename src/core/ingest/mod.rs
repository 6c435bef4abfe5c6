//! Input ingestion
//!
//! Turns raw input lines into normalized [`WorkItem`](crate::core::batch::WorkItem)s
//! for the status store.

mod input;
mod loader;
mod normalize;
mod strategy;


pub use input::{FileInputSource, InputSource, MemoryInputSource};
pub use loader::{IngestOptions, ingest};
pub use normalize::{normalize_identifier, parse_line};
pub use strategy::{DefaultStrategy, SourceStrategy};

use serde::{Deserialize, Serialize};

/// Outcome of one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Lines read from the source
    pub lines: u64,
    /// Lines skipped as blank, comments or unparseable
    pub skipped: u64,
    /// Rows created as `raw`
    pub raw: u64,
    /// Rows created as `success` because a payload already existed
    pub success: u64,
}

impl IngestSummary {
    /// Rows written to the store
    pub fn inserted(&self) -> u64 {
        self.raw + self.success
    }
}
