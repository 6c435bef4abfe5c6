//! Core batch orchestration logic

pub mod batch;
pub mod ingest;
