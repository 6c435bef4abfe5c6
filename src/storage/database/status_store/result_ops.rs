use crate::utils::error::{OrchestratorError, Result};
use sea_orm::*;

use super::super::entities::{self, result_payload};
use super::types::StatusStore;

impl StatusStore {
    /// Whether a payload was ever persisted for `key`
    pub async fn has_payload(&self, key: &str) -> Result<bool> {
        let count = entities::ResultPayload::find_by_id(key.to_string())
            .count(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;
        Ok(count > 0)
    }

    /// Latest payload persisted for `key`
    pub async fn payload(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let model = entities::ResultPayload::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;

        match model {
            Some(m) => Ok(Some(serde_json::from_str(&m.payload)?)),
            None => Ok(None),
        }
    }

    /// All persisted payloads ordered by key, for export between runs
    pub async fn export_results(&self) -> Result<Vec<(String, serde_json::Value)>> {
        let models = entities::ResultPayload::find()
            .order_by_asc(result_payload::Column::Key)
            .all(&self.db)
            .await
            .map_err(OrchestratorError::Storage)?;

        models
            .into_iter()
            .map(|m| Ok((m.key, serde_json::from_str(&m.payload)?)))
            .collect()
    }
}
