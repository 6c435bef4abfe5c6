use crate::core::ingest::IngestSummary;
use crate::storage::database::StoreStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// No pending identifier left to attempt in this run
    Finished,
    /// Remaining work was left for the next run
    StoppedFatal { explicit_fatal: bool, reason: String },
}

impl RunOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, RunOutcome::Finished)
    }
}

/// Summary of one driver run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    pub ingested: IngestSummary,
    pub units_dispatched: u64,
    /// Items handed to the dispatch backend
    pub attempted: u64,
    pub backoffs_taken: u64,
    /// Store counters after the run
    pub stats: StoreStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
