use serde::{Deserialize, Serialize};

use super::super::types::UnitTally;

/// Where the driver currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverPhase {
    #[default]
    Idle,
    Ingesting,
    Dispatching,
    Backoff,
    Finished,
    StoppedFatal,
}

/// Failure-rate rule applied after every unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePolicy {
    /// Rate above which a unit counts as breaching
    pub threshold: f64,
    /// Units of this size or smaller are never rate-checked
    pub min_unit_size: usize,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            min_unit_size: 5,
        }
    }
}

/// What the driver does after a unit
#[derive(Debug, Clone, PartialEq)]
pub enum UnitDecision {
    Continue,
    /// Sleep for the backoff duration before the next unit
    Backoff { failure_rate: f64 },
    /// Abandon the remaining work of this run
    Stop { explicit_fatal: bool, reason: String },
}

/// Transient per-run driver state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverState {
    pub phase: DriverPhase,
    pub stopped: bool,
    /// Stop came from an explicit fatal signal rather than the failure rate
    pub stop_reason_is_fatal: bool,
    pub stop_reason: Option<String>,
    pub backoff_active: bool,
    pub units_dispatched: u64,
    pub backoffs_taken: u64,
}

impl DriverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to a new phase
    pub fn enter(self, phase: DriverPhase) -> Self {
        Self { phase, ..self }
    }

    /// Apply the stop and backoff rules to a settled unit.
    ///
    /// `fatal_reason` is the reason of the first fatal-stop item, if any.
    pub fn evaluate(
        mut self,
        tally: &UnitTally,
        fatal_reason: Option<&str>,
        policy: &RatePolicy,
    ) -> (Self, UnitDecision) {
        self.units_dispatched += 1;

        if tally.stopped > 0 {
            let reason = fatal_reason.unwrap_or("fatal failure").to_string();
            return self.stop(true, reason);
        }

        // Small units neither breach nor clear an active backoff
        if tally.size <= policy.min_unit_size {
            self.phase = DriverPhase::Dispatching;
            return (self, UnitDecision::Continue);
        }

        let failure_rate = tally.failure_rate();
        if failure_rate > policy.threshold {
            if self.backoff_active {
                let reason = format!(
                    "failure rate {:.2} above {:.2} on two consecutive units",
                    failure_rate, policy.threshold
                );
                return self.stop(false, reason);
            }

            self.backoff_active = true;
            self.backoffs_taken += 1;
            self.phase = DriverPhase::Backoff;
            return (self, UnitDecision::Backoff { failure_rate });
        }

        self.backoff_active = false;
        self.phase = DriverPhase::Dispatching;
        (self, UnitDecision::Continue)
    }

    fn stop(mut self, explicit_fatal: bool, reason: String) -> (Self, UnitDecision) {
        self.stopped = true;
        self.stop_reason_is_fatal = explicit_fatal;
        self.stop_reason = Some(reason.clone());
        self.phase = DriverPhase::StoppedFatal;
        (
            self,
            UnitDecision::Stop {
                explicit_fatal,
                reason,
            },
        )
    }
}
