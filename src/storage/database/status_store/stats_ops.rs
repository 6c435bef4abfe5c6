use crate::utils::error::{OrchestratorError, Result};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::warn;

use super::super::entities::{self, identifier};
use super::types::{IdentifierStatus, StatusStore, StoreStats};

impl StatusStore {
    /// Count total, distinct and per-status identifiers plus stored payloads
    pub async fn collect_stats(&self) -> Result<StoreStats> {
        let total = entities::Identifier::find()
            .count(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;

        let distinct = entities::Identifier::find()
            .select_only()
            .column(identifier::Column::Key)
            .distinct()
            .count(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;

        let per_status: Vec<(String, i64)> = entities::Identifier::find()
            .select_only()
            .column(identifier::Column::Status)
            .column_as(Expr::col(identifier::Column::Id).count(), "count")
            .group_by(identifier::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;

        let payloads = entities::ResultPayload::find()
            .count(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;

        let mut stats = StoreStats {
            total,
            distinct,
            payloads,
            ..Default::default()
        };

        for (status, count) in per_status {
            let count = count.max(0) as u64;
            match status.parse::<IdentifierStatus>() {
                Ok(IdentifierStatus::Raw) => stats.raw = count,
                Ok(IdentifierStatus::Success) => stats.success = count,
                Ok(IdentifierStatus::Invalid) => stats.invalid = count,
                Ok(IdentifierStatus::Retry) => stats.retry = count,
                Err(e) => warn!("Ignoring {} rows: {}", count, e),
            }
        }

        Ok(stats)
    }
}
