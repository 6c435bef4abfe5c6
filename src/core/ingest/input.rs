use crate::utils::error::{OrchestratorError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where new raw input lines come from
#[async_trait]
pub trait InputSource: Send {
    /// Lines not yet handed out; empty when nothing is new
    async fn read_lines(&mut self) -> Result<Vec<String>>;
}

/// In-memory lines, handed out once
#[derive(Debug, Clone, Default)]
pub struct MemoryInputSource {
    lines: Vec<String>,
}

impl MemoryInputSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Queue more lines for the next read
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

#[async_trait]
impl InputSource for MemoryInputSource {
    async fn read_lines(&mut self) -> Result<Vec<String>> {
        Ok(std::mem::take(&mut self.lines))
    }
}

/// Text files read once each.
///
/// Moving or marking the files as processed is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct FileInputSource {
    pending: Vec<PathBuf>,
    consumed: Vec<PathBuf>,
}

impl FileInputSource {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            pending: paths.into_iter().map(Into::into).collect(),
            consumed: Vec::new(),
        }
    }

    /// Files read so far
    pub fn consumed(&self) -> &[PathBuf] {
        &self.consumed
    }
}

#[async_trait]
impl InputSource for FileInputSource {
    async fn read_lines(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();

        for path in std::mem::take(&mut self.pending) {
            let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                OrchestratorError::ingestion(format!(
                    "Failed to read input file {}: {}",
                    path.display(),
                    e
                ))
            })?;

            let before = lines.len();
            lines.extend(content.lines().map(str::to_string));
            debug!(path = %path.display(), lines = lines.len() - before, "Read input file");
            self.consumed.push(path);
        }

        if !lines.is_empty() {
            info!(files = self.consumed.len(), lines = lines.len(), "Input files loaded");
        }
        Ok(lines)
    }
}
