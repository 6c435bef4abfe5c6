use crate::core::batch::WorkItem;
use crate::storage::database::StatusStore;
use crate::utils::error::Result;
use tracing::{debug, info};

use super::IngestSummary;
use super::input::InputSource;
use super::strategy::SourceStrategy;

/// How new input is written to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Create rows as `raw` even when a payload exists
    pub update_mode: bool,
    /// Drop stored payloads when the new input resets the store
    pub clear_payloads: bool,
}

/// Load new input lines into the store.
///
/// New input replaces the previous identifier set. Without any parseable line the
/// store is left alone so an interrupted run can resume.
pub async fn ingest(
    store: &StatusStore,
    source: &mut dyn InputSource,
    strategy: &dyn SourceStrategy,
    options: IngestOptions,
) -> Result<IngestSummary> {
    let lines = source.read_lines().await?;
    let mut summary = IngestSummary {
        lines: lines.len() as u64,
        ..Default::default()
    };

    let items: Vec<WorkItem> = lines
        .iter()
        .filter_map(|line| strategy.parse_line(line))
        .collect();
    summary.skipped = summary.lines - items.len() as u64;

    if items.is_empty() {
        debug!(lines = summary.lines, "No new identifiers to ingest");
        return Ok(summary);
    }

    let inserted = store
        .replace_input(&items, options.update_mode, options.clear_payloads)
        .await?;
    summary.raw = inserted.raw;
    summary.success = inserted.success;

    info!(
        lines = summary.lines,
        skipped = summary.skipped,
        raw = summary.raw,
        already_done = summary.success,
        "Input ingested"
    );
    Ok(summary)
}
