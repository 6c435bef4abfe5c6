use crate::core::batch::WorkItem;
use crate::storage::database::PendingRecord;

use super::normalize::parse_line;

/// Source-specific hooks used by the driver.
///
/// One strategy exists per external source; the driver only talks to this trait.
pub trait SourceStrategy: Send + Sync {
    /// Turn an input line into a work item; `None` skips the line
    fn parse_line(&self, line: &str) -> Option<WorkItem>;

    /// Build the items of one dispatch unit from pending records
    fn build_unit(&self, records: &[PendingRecord]) -> Vec<WorkItem> {
        records.iter().map(WorkItem::from).collect()
    }

    /// Key under which a successful item is persisted
    fn success_key(&self, item: &WorkItem) -> String {
        item.key.clone()
    }
}

/// Line format `IDENTIFIER[;QUALIFIER]` with punctuation-insensitive identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

impl SourceStrategy for DefaultStrategy {
    fn parse_line(&self, line: &str) -> Option<WorkItem> {
        parse_line(line)
    }
}
