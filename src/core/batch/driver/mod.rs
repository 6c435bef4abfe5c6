//! Batch driver
//!
//! Ingests new input, slices pending identifiers into dispatch units, persists each
//! settled unit, and decides after every unit whether to continue, back off, or
//! stop the run.

mod report;
mod runner;
mod state;

pub use report::{RunOutcome, RunReport};
pub use runner::BatchDriver;
pub use state::{DriverPhase, DriverState, RatePolicy, UnitDecision};
