//! Batch driver integration tests
//!
//! Full runs over file input, resumption across runs, and custom strategies.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedExecutor, TestStore, input_file, numbered_keys};
    use crate::{assert_err, assert_ok};
    use registry_batch::config::{DispatchConfig, DriverConfig};
    use registry_batch::core::ingest::{MemoryInputSource, SourceStrategy};
    use registry_batch::{
        BatchDriver, BoundedDispatcher, ExecutionError, FieldProjection, FileInputSource,
        IdentifierStatus, OrchestratorError, RunOutcome, WorkItem,
    };
    use serde_json::json;
    use std::sync::Arc;

    fn driver_config(unit_size: usize) -> DriverConfig {
        DriverConfig {
            unit_size,
            backoff_secs: 0,
            ..Default::default()
        }
    }

    fn driver(store: &TestStore, executor: ScriptedExecutor, unit_size: usize) -> BatchDriver {
        let backend = Arc::new(BoundedDispatcher::new(
            executor,
            DispatchConfig::default().with_max_concurrency(4),
        ));
        BatchDriver::new(store.store_arc(), backend, driver_config(unit_size))
    }

    #[tokio::test]
    async fn test_file_input_run() {
        let store = TestStore::new().await;
        let executor = ScriptedExecutor::new()
            .fail("22222222000122", ExecutionError::validation("404: unknown id"))
            .fail("33333333000133", ExecutionError::from_http_status(503, "maintenance"));

        let file = input_file(&[
            "# exported from the registry",
            "11.111.111/0001-11;SP",
            "22.222.222/0001-22",
            "33.333.333/0001-33",
            "",
        ]);
        let mut source = FileInputSource::new([file.path()]);

        let report = assert_ok!(driver(&store, executor, 100).run(&mut source).await);

        assert!(report.outcome.is_finished());
        assert_eq!(report.ingested.lines, 5);
        assert_eq!(report.ingested.skipped, 2);
        assert_eq!(report.ingested.raw, 3);
        assert_eq!(store.status("11111111000111").await, IdentifierStatus::Success);
        assert_eq!(store.status("22222222000122").await, IdentifierStatus::Invalid);
        assert_eq!(store.status("33333333000133").await, IdentifierStatus::Retry);
        assert_eq!(source.consumed().len(), 1);
    }

    #[tokio::test]
    async fn test_fatal_stop_resumes_next_run() {
        let store = TestStore::new().await;
        let executor =
            ScriptedExecutor::new().fail("Q13", ExecutionError::fatal("403: daily quota exceeded"));
        let driver = driver(&store, executor.clone(), 10);

        let first = assert_ok!(
            driver
                .run(&mut MemoryInputSource::new(numbered_keys("Q", 35)))
                .await
        );
        assert!(matches!(
            first.outcome,
            RunOutcome::StoppedFatal {
                explicit_fatal: true,
                ..
            }
        ));
        assert_eq!(first.units_dispatched, 2);
        assert_eq!(first.stats.success, 19);
        assert_eq!(first.stats.raw, 16);

        // Quota restored: the next run picks up the rest without new input
        let second = assert_ok!(driver.run(&mut MemoryInputSource::default()).await);
        assert!(second.outcome.is_finished());
        assert_eq!(second.attempted, 16);
        assert_eq!(second.stats.success, 35);
        assert_eq!(executor.calls_for("Q13"), 2);
        assert_eq!(executor.calls_for("Q01"), 1);
    }

    #[tokio::test]
    async fn test_large_input_spans_several_slices() {
        let store = TestStore::new().await;
        let executor = ScriptedExecutor::new();
        let config = DriverConfig {
            requests_per_batch: 25,
            ..driver_config(10)
        };
        let backend = Arc::new(BoundedDispatcher::new(
            executor.clone(),
            DispatchConfig::default(),
        ));
        let driver = BatchDriver::new(store.store_arc(), backend, config);

        let report = assert_ok!(
            driver
                .run(&mut MemoryInputSource::new(numbered_keys("S", 60)))
                .await
        );

        assert!(report.outcome.is_finished());
        assert_eq!(report.attempted, 60);
        // Slices of 25, 25 and 10 cut into units of at most 10
        assert_eq!(report.units_dispatched, 7);
        assert_eq!(executor.calls(), numbered_keys("S", 60));
    }

    #[tokio::test]
    async fn test_projection_is_what_gets_stored() {
        let store = TestStore::new().await;
        let extractor = Arc::new(FieldProjection::new(["id", "name", "address.city"]));
        let driver = driver(&store, ScriptedExecutor::new(), 100).with_extractor(extractor);

        assert_ok!(driver.run(&mut MemoryInputSource::new(["P1"])).await);

        let stored = assert_ok!(store.store().payload("P1").await);
        assert_eq!(
            stored,
            Some(json!({
                "id": "P1",
                "name": "COMPANY P1",
                "address.city": "Recife"
            }))
        );
    }

    /// Pipe-separated input with a source prefix on every key
    struct PrefixedStrategy;

    impl SourceStrategy for PrefixedStrategy {
        fn parse_line(&self, line: &str) -> Option<WorkItem> {
            let (key, qualifier) = line.split_once('|')?;
            Some(WorkItem::new(format!("BR-{}", key.trim())).with_qualifier(qualifier.trim()))
        }
    }

    #[tokio::test]
    async fn test_custom_strategy() {
        let store = TestStore::new().await;
        let executor = ScriptedExecutor::new();
        let driver = driver(&store, executor.clone(), 100).with_strategy(Arc::new(PrefixedStrategy));

        let report = assert_ok!(
            driver
                .run(&mut MemoryInputSource::new(["100 | RJ", "no separator", "200|SP"]))
                .await
        );

        assert_eq!(report.ingested.skipped, 1);
        assert_eq!(executor.calls(), vec!["BR-100", "BR-200"]);
        assert_eq!(store.status("BR-200").await, IdentifierStatus::Success);
    }

    #[tokio::test]
    async fn test_missing_input_file_aborts_before_dispatch() {
        let store = TestStore::new().await;
        let executor = ScriptedExecutor::new();
        let driver = driver(&store, executor.clone(), 100);

        assert_ok!(driver.run(&mut MemoryInputSource::new(["KEEP"])).await);

        let mut source = FileInputSource::new(["/nonexistent/registry/input.txt"]);
        let err = assert_err!(driver.run(&mut source).await);
        assert!(matches!(err, OrchestratorError::Ingestion(_)));

        // Earlier progress is untouched
        assert_eq!(store.status("KEEP").await, IdentifierStatus::Success);
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_payloads_on_new_input() {
        let store = TestStore::new().await;
        let executor = ScriptedExecutor::new();
        let driver = driver(&store, executor.clone(), 100).with_clear_payloads(true);

        assert_ok!(driver.run(&mut MemoryInputSource::new(["A"])).await);
        let report = assert_ok!(driver.run(&mut MemoryInputSource::new(["A"])).await);

        // Payloads were dropped, so A is fetched again
        assert_eq!(report.ingested.raw, 1);
        assert_eq!(executor.calls_for("A"), 2);
        assert_eq!(report.stats.payloads, 1);
    }
}
