use crate::config::DriverConfig;
use crate::core::ingest::{
    DefaultStrategy, IngestOptions, IngestSummary, InputSource, SourceStrategy, ingest,
};
use crate::storage::database::{IdentifierStatus, StatusStore, StatusUpdate};
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::super::traits::{Dispatch, FieldExtractor, PassThroughExtractor};
use super::super::types::{DispatchOutcome, WorkItem};
use super::super::worker_pool::PoolEvent;
use super::report::{RunOutcome, RunReport};
use super::state::{DriverPhase, DriverState, RatePolicy, UnitDecision};

/// Resumable batch run over the status store
pub struct BatchDriver {
    store: Arc<StatusStore>,
    backend: Arc<dyn Dispatch>,
    extractor: Arc<dyn FieldExtractor>,
    strategy: Arc<dyn SourceStrategy>,
    config: DriverConfig,
    clear_payloads: bool,
}

impl BatchDriver {
    /// Create a driver with the pass-through extractor and the default strategy
    pub fn new(store: Arc<StatusStore>, backend: Arc<dyn Dispatch>, config: DriverConfig) -> Self {
        Self {
            store,
            backend,
            extractor: Arc::new(PassThroughExtractor),
            strategy: Arc::new(DefaultStrategy),
            config,
            clear_payloads: false,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn FieldExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn SourceStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Also clear stored payloads when new input resets the store
    pub fn with_clear_payloads(mut self, clear_payloads: bool) -> Self {
        self.clear_payloads = clear_payloads;
        self
    }

    pub fn policy(&self) -> RatePolicy {
        RatePolicy {
            threshold: self.config.failure_rate_threshold,
            min_unit_size: self.config.min_unit_size_for_rate_check,
        }
    }

    /// Ingest new input, then work through pending identifiers until none are left
    /// or a stop rule fires.
    ///
    /// Progress is persisted after every unit, so a failed or stopped run resumes
    /// where it left off.
    pub async fn run(&self, source: &mut dyn InputSource) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, backend = self.backend.name(), "Batch run started");

        let state = DriverState::new().enter(DriverPhase::Ingesting);
        let ingested = self.ingest(source).await.inspect_err(|e| {
            error!(%run_id, "Ingestion failed, nothing dispatched: {}", e);
        })?;

        let mut attempted = 0;
        let state = self
            .dispatch_pending(state.enter(DriverPhase::Dispatching), &mut attempted)
            .await
            .inspect_err(|e| {
                error!(%run_id, code = e.code(), fatal = e.is_fatal(), "Batch run aborted: {}", e)
            })?;

        let outcome = if state.stopped {
            RunOutcome::StoppedFatal {
                explicit_fatal: state.stop_reason_is_fatal,
                reason: state.stop_reason.clone().unwrap_or_default(),
            }
        } else {
            RunOutcome::Finished
        };

        let stats = self.store.collect_stats().await?;
        let report = RunReport {
            run_id,
            outcome,
            ingested,
            units_dispatched: state.units_dispatched,
            attempted,
            backoffs_taken: state.backoffs_taken,
            stats,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            %run_id,
            finished = report.outcome.is_finished(),
            units = report.units_dispatched,
            attempted = report.attempted,
            success = report.stats.success,
            pending = report.stats.pending(),
            "Batch run ended"
        );
        Ok(report)
    }

    /// Load new input lines into the store
    pub async fn ingest(&self, source: &mut dyn InputSource) -> Result<IngestSummary> {
        let options = IngestOptions {
            update_mode: self.config.update_mode,
            clear_payloads: self.clear_payloads,
        };
        ingest(&self.store, source, self.strategy.as_ref(), options).await
    }

    async fn dispatch_pending(
        &self,
        mut state: DriverState,
        attempted: &mut u64,
    ) -> Result<DriverState> {
        let policy = self.policy();
        let unit_size = self.config.unit_size.max(1);
        let mut cursor: Option<i32> = None;

        loop {
            let slice = self
                .store
                .select_pending(
                    &IdentifierStatus::PENDING,
                    self.config.requests_per_batch,
                    cursor,
                )
                .await?;

            let Some(last) = slice.last() else {
                return Ok(state.enter(DriverPhase::Finished));
            };
            // Keys sliced in this run are not picked up again until the next run
            cursor = Some(last.first_row);
            debug!(size = slice.len(), cursor = last.first_row, "Pending slice selected");

            for records in slice.chunks(unit_size) {
                let unit = self.strategy.build_unit(records);
                *attempted += unit.len() as u64;

                let outcome = self.settle_unit(unit).await?;
                let (next, decision) =
                    state.evaluate(&outcome.tally(), outcome.first_stop_reason(), &policy);
                state = next;

                match decision {
                    UnitDecision::Continue => {}
                    UnitDecision::Backoff { failure_rate } => {
                        let pause = self.config.backoff_duration();
                        warn!(
                            failure_rate,
                            threshold = policy.threshold,
                            pause_secs = pause.as_secs(),
                            "Failure rate too high, backing off"
                        );
                        tokio::time::sleep(pause).await;
                        state = state.enter(DriverPhase::Dispatching);
                    }
                    UnitDecision::Stop {
                        explicit_fatal,
                        reason,
                    } => {
                        error!(explicit_fatal, "Batch run stopped: {}", reason);
                        return Ok(state);
                    }
                }
            }
        }
    }

    /// Dispatch one unit and persist its transitions
    async fn settle_unit(&self, unit: Vec<WorkItem>) -> Result<DispatchOutcome> {
        let outcome = self.backend.dispatch(unit).await;

        for event in self.backend.take_events() {
            match event {
                PoolEvent::OrphanCrash {
                    worker_id,
                    task_id,
                    cause,
                } => error!(worker_id, task_id, "Worker crashed outside any task: {}", cause),
            }
        }

        let update = StatusUpdate {
            succeeded: outcome
                .succeeded
                .iter()
                .map(|(item, raw)| (self.strategy.success_key(item), self.extractor.extract(raw)))
                .collect(),
            invalid: outcome.invalid.iter().map(|(item, _)| item.key.clone()).collect(),
            retry: outcome.retryable.iter().map(|(item, _)| item.key.clone()).collect(),
        };

        for (item, reason) in &outcome.invalid {
            debug!(key = %item.key, "Invalid identifier: {}", reason);
        }
        for (item, reason) in &outcome.stopped {
            warn!(key = %item.key, "Stop signal: {}", reason);
        }

        self.store.update_status(&update).await.inspect_err(|e| {
            error!(size = outcome.len(), "Failed to persist unit: {}", e);
        })?;

        debug!(
            succeeded = outcome.succeeded.len(),
            retryable = outcome.retryable.len(),
            invalid = outcome.invalid.len(),
            stopped = outcome.stopped.len(),
            "Unit persisted"
        );
        Ok(outcome)
    }
}
