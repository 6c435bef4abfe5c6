//! Batch orchestration types and data structures

use crate::storage::database::PendingRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::classifier::Classification;

/// One unit of work: an identifier plus its optional qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    /// Normalized identifier
    pub key: String,
    /// Secondary qualifier from the input line
    pub qualifier: Option<String>,
}

impl WorkItem {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            qualifier: None,
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }
}

impl From<&PendingRecord> for WorkItem {
    fn from(record: &PendingRecord) -> Self {
        Self {
            key: record.key.clone(),
            qualifier: record.qualifier.clone(),
        }
    }
}

/// Typed failure returned by an executor or a parse job
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Transient or network-level issue; the identifier is retried in a later run
    #[error("Retryable failure: {0}")]
    Retryable(String),

    /// The request is invalid for this identifier; terminal until corrected externally
    #[error("Validation failure: {0}")]
    Validation(String),

    /// Source-imposed hard stop (quota exhausted, access revoked, challenge triggered)
    #[error("Fatal failure: {0}")]
    Fatal(String),

    /// A worker thread crashed while running the task
    #[error("Worker crashed on task {task_id} ({key}): {cause}")]
    WorkerCrashed {
        task_id: u64,
        key: String,
        cause: String,
    },
}

impl ExecutionError {
    pub fn retryable<S: Into<String>>(message: S) -> Self {
        Self::Retryable(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn fatal<S: Into<String>>(message: S) -> Self {
        Self::Fatal(message.into())
    }

    /// Map a transport status code to a typed failure.
    ///
    /// Executors keep source-specific overrides to themselves; this covers the
    /// common HTTP conventions.
    pub fn from_http_status<S: Into<String>>(status: u16, message: S) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Fatal(format!("{}: {}", status, message)),
            408 | 429 => Self::Retryable(format!("{}: {}", status, message)),
            400..=499 => Self::Validation(format!("{}: {}", status, message)),
            _ => Self::Retryable(format!("{}: {}", status, message)),
        }
    }
}

/// Per-unit result of a dispatch, partitioned four ways.
///
/// Every dispatched item lands in exactly one group.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// Items that succeeded, with the raw executor payload
    pub succeeded: Vec<(WorkItem, Value)>,
    /// Network-level failures
    pub retryable: Vec<(WorkItem, String)>,
    /// Source-policy violations that stop the run
    pub stopped: Vec<(WorkItem, String)>,
    /// Input-validation failures
    pub invalid: Vec<(WorkItem, String)>,
}

impl DispatchOutcome {
    /// File an item under its classification
    pub fn push(&mut self, item: WorkItem, classification: Classification) {
        match classification {
            Classification::Success(payload) => self.succeeded.push((item, payload)),
            Classification::Retryable(reason) => self.retryable.push((item, reason)),
            Classification::ValidationInvalid(reason) => self.invalid.push((item, reason)),
            Classification::FatalStop(reason) => self.stopped.push((item, reason)),
        }
    }

    /// Number of items across all groups
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.retryable.len() + self.stopped.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tally(&self) -> UnitTally {
        UnitTally {
            size: self.len(),
            succeeded: self.succeeded.len(),
            retryable: self.retryable.len(),
            invalid: self.invalid.len(),
            stopped: self.stopped.len(),
        }
    }

    /// Reason of the first stop signal, if any
    pub fn first_stop_reason(&self) -> Option<&str> {
        self.stopped.first().map(|(_, reason)| reason.as_str())
    }
}

impl FromIterator<(WorkItem, Classification)> for DispatchOutcome {
    fn from_iter<I: IntoIterator<Item = (WorkItem, Classification)>>(iter: I) -> Self {
        let mut outcome = Self::default();
        for (item, classification) in iter {
            outcome.push(item, classification);
        }
        outcome
    }
}

/// Counts of one settled dispatch unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTally {
    pub size: usize,
    pub succeeded: usize,
    pub retryable: usize,
    pub invalid: usize,
    pub stopped: usize,
}

impl UnitTally {
    /// `retryable / (succeeded + retryable)`, 0 when nothing counted.
    ///
    /// Validation failures stay out of the denominator: they say nothing about the
    /// health of the source.
    pub fn failure_rate(&self) -> f64 {
        let denominator = self.succeeded + self.retryable;
        if denominator == 0 {
            0.0
        } else {
            self.retryable as f64 / denominator as f64
        }
    }
}
