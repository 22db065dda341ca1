//! Error taxonomy for the benchmark harness.

use thiserror::Error;

use crate::schema::{ResultSet, WorkloadKind};

/// Failures surfaced by workload runners and the statement-execution seam.
///
/// No variant is retried anywhere; a failed operation aborts its workload.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Workload configuration with a zero count, cadence, or size.
    #[error("invalid parameter `{0}`: must be a positive integer")]
    InvalidParameter(&'static str),

    /// Statistics were requested for a workload with no observations.
    #[error("latency sample is empty")]
    EmptySample,

    /// The test table has no rows for a read workload to target.
    #[error("no rows available in perf_test_writes")]
    NoData,

    /// Every worker in a concurrent dispatch failed.
    #[error("all {0} concurrent workers failed")]
    NoSuccessfulWorkers(usize),

    #[error(transparent)]
    Db(#[from] mysql::Error),

    /// Opaque statement-execution failure from a non-driver executor.
    #[error("statement execution failed: {0}")]
    Execution(String),
}

/// A workload failure that aborted the remaining session sequence.
///
/// Results collected before the failure are preserved in `partial` so the
/// caller can still inspect or persist them.
#[derive(Debug, Error)]
#[error("{kind} workload failed: {source}")]
pub struct SessionError {
    pub kind: WorkloadKind,
    #[source]
    pub source: BenchError,
    pub partial: ResultSet,
}

/// Failures while saving or loading result files.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid result file: {0}")]
    Json(#[from] serde_json::Error),
}
