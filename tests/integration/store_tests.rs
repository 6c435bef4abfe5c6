//! Status store integration tests
//!
//! Persistence across reopen and the layout other tools read between runs.

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use registry_batch::config::StoreConfig;
    use registry_batch::storage::database::StatusUpdate;
    use registry_batch::{IdentifierStatus, StatusStore, WorkItem};
    use serde_json::json;

    fn file_config(dir: &tempfile::TempDir) -> StoreConfig {
        let path = dir.path().join("registry.db");
        StoreConfig::default().with_url(format!("sqlite://{}?mode=rwc", path.display()))
    }

    #[tokio::test]
    async fn test_progress_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);

        {
            let store = assert_ok!(StatusStore::open(&config).await);
            let items: Vec<WorkItem> = ["A", "B", "C"].into_iter().map(WorkItem::new).collect();
            assert_ok!(store.insert_many(&items, false).await);
            assert_ok!(
                store
                    .update_status(&StatusUpdate {
                        succeeded: vec![("A".to_string(), json!({"name": "ACME"}))],
                        retry: vec!["B".to_string()],
                        ..Default::default()
                    })
                    .await
            );
            assert_ok!(store.close().await);
        }

        let store = assert_ok!(StatusStore::open(&config).await);
        let stats = assert_ok!(store.collect_stats().await);
        assert_eq!(stats.success, 1);
        assert_eq!(stats.retry, 1);
        assert_eq!(stats.raw, 1);
        assert_eq!(
            assert_ok!(store.payload("A").await),
            Some(json!({"name": "ACME"}))
        );

        let pending = assert_ok!(
            store
                .select_pending(&IdentifierStatus::PENDING, 10, None)
                .await
        );
        let keys: Vec<&str> = pending.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);

        let store = assert_ok!(StatusStore::open(&config).await);
        assert_ok!(store.migrate().await);
        assert_ok!(store.health_check().await);
    }
}
