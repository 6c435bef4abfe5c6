//! Test fixtures and executors

use async_trait::async_trait;
use parking_lot::Mutex;
use registry_batch::{ExecutionError, RequestExecutor, WorkItem};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Executor answering from a per-key script; unscripted keys succeed
#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    script: Arc<Mutex<HashMap<String, Vec<ExecutionError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next attempt of `key` with `error`; repeated calls queue up failures
    pub fn fail(self, key: &str, error: ExecutionError) -> Self {
        self.script
            .lock()
            .entry(key.to_string())
            .or_default()
            .push(error);
        self
    }

    /// Every key executed so far, sorted
    pub fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().clone();
        calls.sort();
        calls
    }

    /// Number of times `key` was executed
    pub fn calls_for(&self, key: &str) -> usize {
        self.calls.lock().iter().filter(|k| *k == key).count()
    }

    /// Payload returned for a successful key
    pub fn payload_for(key: &str) -> Value {
        json!({
            "id": key,
            "name": format!("COMPANY {}", key),
            "address": {"city": "Recife", "state": "PE"},
            "raw_html": "<html></html>"
        })
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, item: &WorkItem) -> Result<Value, ExecutionError> {
        self.calls.lock().push(item.key.clone());

        let scripted = {
            let mut script = self.script.lock();
            script
                .get_mut(&item.key)
                .and_then(|errors| (!errors.is_empty()).then(|| errors.remove(0)))
        };

        match scripted {
            Some(error) => Err(error),
            None => Ok(Self::payload_for(&item.key)),
        }
    }
}

/// `prefix01`, `prefix02`, ...
pub fn numbered_keys(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{}{:02}", prefix, i)).collect()
}

/// Temporary input file holding `lines`
pub fn input_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create input file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write input file");
    }
    file
}
