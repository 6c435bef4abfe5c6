//! Batch orchestration core
//!
//! Pending identifiers are settled in dispatch units through a [`Dispatch`] backend,
//! either the async [`BoundedDispatcher`] for network calls or the thread-backed
//! [`WorkerPool`] for CPU-bound parse jobs. The [`BatchDriver`] persists every
//! unit and applies the failure-rate rules between units.

mod classifier;
mod dispatcher;
mod driver;
mod throttle;
mod traits;
mod types;
mod worker_pool;


// Re-export all public types
pub use classifier::{Classification, classify};
pub use dispatcher::{BoundedDispatcher, SettledItem};
pub use driver::{
    BatchDriver, DriverPhase, DriverState, RatePolicy, RunOutcome, RunReport, UnitDecision,
};
pub use throttle::StartThrottle;
pub use traits::{Dispatch, FieldExtractor, FieldProjection, PassThroughExtractor, RequestExecutor};
pub use types::{DispatchOutcome, ExecutionError, UnitTally, WorkItem};
pub use worker_pool::{ParseJob, PoolEvent, TaskHandle, WorkerPool};
