//! Worker pool integration tests

#[cfg(test)]
mod tests {
    use crate::common::{TestStore, numbered_keys};
    use crate::{assert_err, assert_ok};
    use registry_batch::config::DriverConfig;
    use registry_batch::core::ingest::MemoryInputSource;
    use registry_batch::{
        BatchDriver, ExecutionError, IdentifierStatus, OrchestratorError, WorkItem, WorkerPool,
    };
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    /// Stand-in for document parsing: digits are summed, `X` keys are corrupt
    fn parse(item: &WorkItem) -> Result<serde_json::Value, ExecutionError> {
        if item.key.contains('X') {
            panic!("corrupt document {}", item.key);
        }
        if item.key.is_empty() {
            return Err(ExecutionError::validation("empty document"));
        }
        std::thread::sleep(Duration::from_millis(2));
        let checksum: u32 = item.key.chars().filter_map(|c| c.to_digit(10)).sum();
        Ok(json!({ "key": item.key, "checksum": checksum }))
    }

    #[tokio::test]
    async fn test_every_task_resolves_exactly_once() {
        let pool = WorkerPool::with_job(4, parse);

        let mut keys = numbered_keys("D", 40);
        keys[7] = "DX07".to_string();
        keys[21] = "DX21".to_string();

        let handles: Vec<_> = keys
            .iter()
            .map(|k| assert_ok!(pool.submit(WorkItem::new(k.clone()))))
            .collect();
        let ids: HashSet<u64> = handles.iter().map(|h| h.task_id()).collect();
        assert_eq!(ids.len(), 40);

        let results = futures::future::join_all(handles).await;
        let crashed = results
            .iter()
            .filter(|r| matches!(r, Err(ExecutionError::WorkerCrashed { .. })))
            .count();
        assert_eq!(crashed, 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 38);

        assert_eq!(pool.live_workers(), 4);
        assert_ok!(pool.drain().await);
        assert_eq!(pool.live_workers(), 0);
    }

    #[tokio::test]
    async fn test_drain_finishes_queued_work() {
        let pool = WorkerPool::with_job(2, parse);
        let handles: Vec<_> = numbered_keys("Q", 10)
            .into_iter()
            .map(|k| assert_ok!(pool.submit(WorkItem::new(k))))
            .collect();

        assert_ok!(pool.drain().await);
        for handle in handles {
            assert!(handle.await.is_ok());
        }

        let err = assert_err!(pool.submit(WorkItem::new("late")));
        assert!(matches!(err, OrchestratorError::PoolClosed));
    }

    #[tokio::test]
    async fn test_driver_over_pool() {
        let store = TestStore::new().await;
        let pool = Arc::new(WorkerPool::with_job(3, parse));
        let config = DriverConfig {
            unit_size: 8,
            backoff_secs: 0,
            ..Default::default()
        };
        let driver = BatchDriver::new(store.store_arc(), pool.clone(), config);

        let mut lines = numbered_keys("F", 16);
        lines.push("FX99".to_string());
        let report = assert_ok!(driver.run(&mut MemoryInputSource::new(lines)).await);

        assert!(report.outcome.is_finished());
        assert_eq!(report.stats.success, 16);
        assert_eq!(store.status("FX99").await, IdentifierStatus::Retry);
        assert_eq!(
            assert_ok!(store.store().payload("F12").await),
            Some(json!({"key": "F12", "checksum": 3}))
        );
        assert_eq!(pool.live_workers(), pool.size());
        assert_ok!(pool.drain().await);
    }
}
