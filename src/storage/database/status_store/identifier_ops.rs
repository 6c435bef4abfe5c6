use crate::core::batch::WorkItem;
use crate::utils::error::{OrchestratorError, Result};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::*;
use std::collections::HashSet;
use tracing::{debug, info};

use super::super::entities::{self, identifier, result_payload};
use super::types::{IdentifierStatus, InsertSummary, PendingRecord, StatusStore, StatusUpdate};

/// Keys bound per statement, below SQLite's host parameter limit
const KEY_CHUNK: usize = 500;

impl StatusStore {
    /// Clear identifier rows, and payload rows when `clear_payloads` is set
    pub async fn reset(&self, clear_payloads: bool) -> Result<()> {
        let txn = self.db.begin().await.map_err(OrchestratorError::Storage)?;
        let (removed, cleared) = Self::delete_rows(&txn, clear_payloads).await?;
        txn.commit().await.map_err(OrchestratorError::Storage)?;

        info!(
            removed_identifiers = removed,
            cleared_payloads = cleared,
            "Status store reset"
        );
        Ok(())
    }

    /// Insert one identifier row.
    ///
    /// Outside update mode an identifier that already has a payload is created as
    /// `success` so it is never dispatched again.
    pub async fn insert(
        &self,
        key: &str,
        qualifier: Option<&str>,
        update_mode: bool,
    ) -> Result<IdentifierStatus> {
        let status = if !update_mode && self.has_payload(key).await? {
            IdentifierStatus::Success
        } else {
            IdentifierStatus::Raw
        };

        entities::Identifier::insert(Self::new_row(key, qualifier, status))
            .exec(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;

        Ok(status)
    }

    /// Insert many identifier rows in one transaction, with the same rule as [`Self::insert`]
    pub async fn insert_many(&self, items: &[WorkItem], update_mode: bool) -> Result<InsertSummary> {
        if items.is_empty() {
            return Ok(InsertSummary::default());
        }

        let txn = self.db.begin().await.map_err(OrchestratorError::Storage)?;
        let summary = Self::insert_rows(&txn, items, update_mode).await?;
        txn.commit().await.map_err(OrchestratorError::Storage)?;

        debug!(
            raw = summary.raw,
            success = summary.success,
            "Inserted identifier rows"
        );
        Ok(summary)
    }

    /// Replace the identifier set with `items` in one transaction.
    ///
    /// On any error the previous rows, pending ones included, are kept.
    pub async fn replace_input(
        &self,
        items: &[WorkItem],
        update_mode: bool,
        clear_payloads: bool,
    ) -> Result<InsertSummary> {
        let txn = self.db.begin().await.map_err(OrchestratorError::Storage)?;
        let (removed, cleared) = Self::delete_rows(&txn, clear_payloads).await?;
        let summary = Self::insert_rows(&txn, items, update_mode).await?;
        txn.commit().await.map_err(OrchestratorError::Storage)?;

        info!(
            removed_identifiers = removed,
            cleared_payloads = cleared,
            raw = summary.raw,
            success = summary.success,
            "Identifier set replaced"
        );
        Ok(summary)
    }

    async fn delete_rows<C: ConnectionTrait>(conn: &C, clear_payloads: bool) -> Result<(u64, u64)> {
        let removed = entities::Identifier::delete_many()
            .exec(conn)
            .await
            .map_err(OrchestratorError::Storage)?
            .rows_affected;

        let cleared = if clear_payloads {
            entities::ResultPayload::delete_many()
                .exec(conn)
                .await
                .map_err(OrchestratorError::Storage)?
                .rows_affected
        } else {
            0
        };

        Ok((removed, cleared))
    }

    async fn insert_rows<C: ConnectionTrait>(
        conn: &C,
        items: &[WorkItem],
        update_mode: bool,
    ) -> Result<InsertSummary> {
        let mut summary = InsertSummary::default();

        for chunk in items.chunks(KEY_CHUNK) {
            let with_payload: HashSet<String> = if update_mode {
                HashSet::new()
            } else {
                entities::ResultPayload::find()
                    .select_only()
                    .column(result_payload::Column::Key)
                    .filter(
                        result_payload::Column::Key.is_in(chunk.iter().map(|i| i.key.clone())),
                    )
                    .into_tuple::<String>()
                    .all(conn)
                    .await
                    .map_err(OrchestratorError::Storage)?
                    .into_iter()
                    .collect()
            };

            let rows: Vec<identifier::ActiveModel> = chunk
                .iter()
                .map(|item| {
                    let status = if with_payload.contains(&item.key) {
                        summary.success += 1;
                        IdentifierStatus::Success
                    } else {
                        summary.raw += 1;
                        IdentifierStatus::Raw
                    };
                    Self::new_row(&item.key, item.qualifier.as_deref(), status)
                })
                .collect();

            entities::Identifier::insert_many(rows)
                .exec(conn)
                .await
                .map_err(OrchestratorError::Storage)?;
        }

        Ok(summary)
    }

    /// Persist the transitions of one dispatch unit atomically.
    ///
    /// Success rows also upsert their payload. Invalid and retry transitions never
    /// overwrite a `success` row.
    pub async fn update_status(&self, update: &StatusUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let txn = self.db.begin().await.map_err(OrchestratorError::Storage)?;

        for (key, payload) in &update.succeeded {
            let model = result_payload::ActiveModel {
                key: Set(key.clone()),
                payload: Set(serde_json::to_string(payload)?),
                updated_at: Set(now),
            };

            entities::ResultPayload::insert(model)
                .on_conflict(
                    OnConflict::column(result_payload::Column::Key)
                        .update_columns([
                            result_payload::Column::Payload,
                            result_payload::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(&txn)
                .await
                .map_err(OrchestratorError::Storage)?;
        }

        let succeeded: Vec<String> = update.succeeded.iter().map(|(k, _)| k.clone()).collect();
        Self::set_status(&txn, &succeeded, IdentifierStatus::Success, now).await?;
        Self::set_status(&txn, &update.invalid, IdentifierStatus::Invalid, now).await?;
        Self::set_status(&txn, &update.retry, IdentifierStatus::Retry, now).await?;

        txn.commit().await.map_err(OrchestratorError::Storage)?;

        debug!(
            success = update.succeeded.len(),
            invalid = update.invalid.len(),
            retry = update.retry.len(),
            "Persisted unit statuses"
        );
        Ok(())
    }

    /// Distinct keys in one of `statuses`, ordered by first ingestion.
    ///
    /// `after` skips keys whose first row id is not greater than the cursor.
    pub async fn select_pending(
        &self,
        statuses: &[IdentifierStatus],
        limit: u64,
        after: Option<i32>,
    ) -> Result<Vec<PendingRecord>> {
        let first_row = Expr::col(identifier::Column::Id).min();

        let mut query = entities::Identifier::find()
            .select_only()
            .column_as(first_row.clone(), "first_row")
            .column(identifier::Column::Key)
            .column_as(Expr::col(identifier::Column::Qualifier).max(), "qualifier")
            .filter(identifier::Column::Status.is_in(statuses.iter().map(|s| s.as_str())))
            .group_by(identifier::Column::Key);

        if let Some(cursor) = after {
            query = query.having(Expr::expr(first_row.clone()).gt(cursor));
        }

        query
            .order_by_asc(first_row)
            .limit(limit)
            .into_model::<PendingRecord>()
            .all(&self.db)
            .await
            .map_err(OrchestratorError::Storage)
    }

    /// Current status of a key, if it was ingested
    pub async fn status_of(&self, key: &str) -> Result<Option<IdentifierStatus>> {
        let row = entities::Identifier::find()
            .filter(identifier::Column::Key.eq(key))
            .order_by_asc(identifier::Column::Id)
            .one(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;

        row.map(|r| {
            r.status
                .parse::<IdentifierStatus>()
                .map_err(OrchestratorError::Internal)
        })
        .transpose()
    }

    fn new_row(
        key: &str,
        qualifier: Option<&str>,
        status: IdentifierStatus,
    ) -> identifier::ActiveModel {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        identifier::ActiveModel {
            key: Set(key.to_string()),
            qualifier: Set(qualifier.map(str::to_string)),
            status: Set(status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    async fn set_status<C: ConnectionTrait>(
        conn: &C,
        keys: &[String],
        status: IdentifierStatus,
        now: DateTimeWithTimeZone,
    ) -> Result<u64> {
        let mut affected = 0;
        for chunk in keys.chunks(KEY_CHUNK) {
            let mut update = entities::Identifier::update_many()
                .col_expr(identifier::Column::Status, Expr::value(status.as_str()))
                .col_expr(identifier::Column::UpdatedAt, Expr::value(now))
                .filter(identifier::Column::Key.is_in(chunk.iter().cloned()));

            if status != IdentifierStatus::Success {
                update = update.filter(
                    identifier::Column::Status.ne(IdentifierStatus::Success.as_str()),
                );
            }

            affected += update
                .exec(conn)
                .await
                .map_err(OrchestratorError::Storage)?
                .rows_affected;
        }
        Ok(affected)
    }
}
