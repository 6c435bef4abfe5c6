//! Bounded Dispatcher - Concurrent Request Processing
//!
//! Settles a dispatch unit against an async executor with a bound on in-flight
//! items and a bound on how fast items start.

use crate::config::DispatchConfig;
use async_trait::async_trait;
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::classifier::{Classification, classify};
use super::throttle::StartThrottle;
use super::traits::{Dispatch, RequestExecutor};
use super::types::{DispatchOutcome, ExecutionError, WorkItem};

/// Result of an individual item in a unit
#[derive(Debug, Clone)]
pub struct SettledItem {
    /// Index of the item in the submitted unit
    pub index: usize,
    pub item: WorkItem,
    pub classification: Classification,
    /// Time from start (after throttling) to settlement
    pub duration: Duration,
}

/// Async executor fan-out with concurrency and start-rate bounds
pub struct BoundedDispatcher<E> {
    executor: E,
    config: DispatchConfig,
    throttle: StartThrottle,
}

impl<E: RequestExecutor> BoundedDispatcher<E> {
    /// Create a new dispatcher
    pub fn new(executor: E, config: DispatchConfig) -> Self {
        let throttle = StartThrottle::new(config.requests_per_second, config.burst);
        Self {
            executor,
            config,
            throttle,
        }
    }

    /// Settle every item of `items`.
    ///
    /// Results come back in input order. Executor panics and timeouts are
    /// classified like any other failure; nothing escapes this call.
    pub async fn execute(&self, items: Vec<WorkItem>) -> Vec<SettledItem> {
        let timeout = self.config.request_timeout();
        let executor = &self.executor;
        let throttle = &self.throttle;

        let mut settled: Vec<SettledItem> = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| async move {
                throttle.until_ready().await;
                let start = Instant::now();

                let call = AssertUnwindSafe(executor.execute(&item)).catch_unwind();
                let result = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, call).await {
                        Ok(result) => result,
                        Err(_) => Ok(Err(ExecutionError::retryable(format!(
                            "Request {} timed out after {:?}",
                            item.key, limit
                        )))),
                    },
                    None => call.await,
                };

                let result = result.unwrap_or_else(|panic| {
                    let cause = panic_message(panic.as_ref());
                    warn!(key = %item.key, "Executor panicked: {}", cause);
                    Err(ExecutionError::retryable(format!("executor panicked: {}", cause)))
                });

                SettledItem {
                    index,
                    classification: classify(result),
                    item,
                    duration: start.elapsed(),
                }
            })
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        // Sort by index to maintain original order
        settled.sort_by_key(|s| s.index);
        settled
    }

    /// Get current configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }
}

#[async_trait]
impl<E: RequestExecutor> Dispatch for BoundedDispatcher<E> {
    async fn dispatch(&self, items: Vec<WorkItem>) -> DispatchOutcome {
        let started = Instant::now();
        let settled = self.execute(items).await;

        let outcome: DispatchOutcome = settled
            .into_iter()
            .map(|s| (s.item, s.classification))
            .collect();

        debug!(
            size = outcome.len(),
            succeeded = outcome.succeeded.len(),
            retryable = outcome.retryable.len(),
            invalid = outcome.invalid.len(),
            stopped = outcome.stopped.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dispatch unit settled"
        );
        outcome
    }

    fn name(&self) -> &'static str {
        "bounded-dispatcher"
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
