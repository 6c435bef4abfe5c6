//! Configuration loading tests

#[cfg(test)]
mod tests {
    use crate::common::input_file;
    use crate::{assert_err, assert_ok};
    use registry_batch::{Config, OrchestratorError, StatusStore};

    #[test]
    fn test_load_file_with_overrides() {
        let file = input_file(&[
            "store:",
            "  url: \"sqlite::memory:\"",
            "dispatch:",
            "  max_concurrency: 2",
            "  request_timeout_ms: 1500",
            "worker_pool:",
            "  number_of_threads: 3",
        ]);

        let config = assert_ok!(tokio_test::block_on(Config::from_file(file.path())));
        let config = assert_ok!(config.with_env_overrides(vec![(
            "REGISTRY_BATCH_UNIT_SIZE".to_string(),
            "25".to_string()
        )]));

        assert_eq!(config.dispatch.max_concurrency, 2);
        assert_eq!(
            config.dispatch.request_timeout(),
            Some(std::time::Duration::from_millis(1500))
        );
        assert_eq!(config.worker_pool.number_of_threads, 3);
        assert_eq!(config.driver.unit_size, 25);
        assert!(config.store.is_in_memory());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let file = input_file(&["driver:", "  failure_rate_threshold: 2.0"]);
        let err = assert_err!(tokio_test::block_on(Config::from_file(file.path())));
        assert!(matches!(err, OrchestratorError::Config(_)));
    }

    #[tokio::test]
    async fn test_store_opens_from_loaded_config() {
        let file = input_file(&["store:", "  url: \"sqlite::memory:\""]);
        let config = assert_ok!(Config::from_file(file.path()).await);
        let store = assert_ok!(StatusStore::open(&config.store).await);
        assert_ok!(store.health_check().await);
    }
}
