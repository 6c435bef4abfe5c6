use sea_orm::{DatabaseConnection, FromQueryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Durable identifier status table plus result payload table
#[derive(Debug)]
pub struct StatusStore {
    pub(super) db: DatabaseConnection,
}

/// Lifecycle status of an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierStatus {
    /// Ingested, never attempted
    Raw,
    /// Fetched and extracted; terminal within a store lifetime
    Success,
    /// Rejected by the source for this identifier; terminal until corrected externally
    Invalid,
    /// Transient failure; eligible again in a later run
    Retry,
}

impl IdentifierStatus {
    /// Statuses the driver picks work from
    pub const PENDING: [IdentifierStatus; 2] = [IdentifierStatus::Raw, IdentifierStatus::Retry];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierStatus::Raw => "raw",
            IdentifierStatus::Success => "success",
            IdentifierStatus::Invalid => "invalid",
            IdentifierStatus::Retry => "retry",
        }
    }
}

impl fmt::Display for IdentifierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(IdentifierStatus::Raw),
            "success" => Ok(IdentifierStatus::Success),
            "invalid" => Ok(IdentifierStatus::Invalid),
            "retry" => Ok(IdentifierStatus::Retry),
            other => Err(format!("unknown identifier status '{}'", other)),
        }
    }
}

/// A distinct pending identifier, as sliced by the driver
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct PendingRecord {
    /// Id of the first row holding this key; the driver's resume cursor
    pub first_row: i32,
    pub key: String,
    pub qualifier: Option<String>,
}

/// Status transitions produced by one dispatch unit
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    /// Keys that succeeded, with the extracted payload to persist
    pub succeeded: Vec<(String, serde_json::Value)>,
    /// Keys the source rejected as invalid
    pub invalid: Vec<String>,
    /// Keys that failed transiently
    pub retry: Vec<String>,
}

impl StatusUpdate {
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.invalid.is_empty() && self.retry.is_empty()
    }
}

/// Outcome of ingesting a set of identifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertSummary {
    /// Rows created as `raw`
    pub raw: u64,
    /// Rows created directly as `success` because a payload already existed
    pub success: u64,
}

/// Aggregate counters rebuilt from the store, for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Identifier rows, duplicates included
    pub total: u64,
    /// Distinct identifier keys
    pub distinct: u64,
    pub raw: u64,
    pub success: u64,
    pub invalid: u64,
    pub retry: u64,
    /// Rows in the result payload table
    pub payloads: u64,
}

impl StoreStats {
    /// Rows still waiting for work (raw or retry)
    pub fn pending(&self) -> u64 {
        self.raw + self.retry
    }
}
