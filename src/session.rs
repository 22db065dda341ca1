//! Session orchestration: one benchmark run against one target.

use chrono::Utc;
use tracing::info;

use crate::error::{BenchError, SessionError};
use crate::executor::ExecutorProvider;
use crate::schema::{ResultSet, WorkloadKind, WorkloadResults};
use crate::workload::{
    self, BatchInsertParams, ConcurrentWriteParams, PointReadParams, RangeReadParams,
    SingleInsertParams, UpdateParams,
};

/// Parameters for the four write workloads.
#[derive(Debug, Clone, Copy)]
pub struct WritePlan {
    pub single: SingleInsertParams,
    pub batch: BatchInsertParams,
    pub concurrent: ConcurrentWriteParams,
    pub updates: UpdateParams,
}

/// Parameters for the two read workloads.
#[derive(Debug, Clone, Copy)]
pub struct ReadPlan {
    pub point: PointReadParams,
    pub range: RangeReadParams,
}

/// Which workloads to run. Read workloads expect rows left behind by the
/// write workloads of the same or an earlier run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionPlan {
    pub writes: Option<WritePlan>,
    pub reads: Option<ReadPlan>,
}

/// One benchmark run against one target.
///
/// Metadata is captured at construction and immutable thereafter. `run`
/// returns a fresh `ResultSet` instead of accumulating state, so a session
/// can be re-run without leaking results between runs.
pub struct BenchmarkSession<P> {
    provider: P,
    label: String,
    host: String,
    database: String,
    timestamp: String,
}

impl<P: ExecutorProvider + Sync> BenchmarkSession<P> {
    pub fn new(
        provider: P,
        label: impl Into<String>,
        host: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            label: label.into(),
            host: host.into(),
            database: database.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Runs the selected workloads in fixed order: single inserts, batch
    /// inserts, concurrent writes, updates, then point reads, range reads.
    /// Update and read workloads rely on rows from the earlier inserts.
    ///
    /// The first failure aborts the remainder; results already collected
    /// ride along in the error.
    pub fn run(&self, plan: &SessionPlan) -> Result<ResultSet, SessionError> {
        let mut results = WorkloadResults::default();

        if let Some(writes) = &plan.writes {
            info!(count = writes.single.count, "running single-insert workload");
            let single = self.run_step(WorkloadKind::SingleInserts, &results, |exec| {
                workload::run_single_inserts(exec, &writes.single)
            })?;
            results.single_inserts = Some(single);

            info!(batches = writes.batch.batches, "running batch-insert workload");
            let batch = self.run_step(WorkloadKind::BatchInserts, &results, |exec| {
                workload::run_batch_inserts(exec, &writes.batch)
            })?;
            results.batch_inserts = Some(batch);

            info!(threads = writes.concurrent.workers, "running concurrent-write workload");
            let concurrent = workload::run_concurrent_writes(&self.provider, &writes.concurrent)
                .map_err(|source| self.fail(WorkloadKind::ConcurrentWrites, source, &results))?;
            results.concurrent_writes = Some(concurrent);

            info!(count = writes.updates.count, "running update workload");
            let updates = self.run_step(WorkloadKind::Updates, &results, |exec| {
                workload::run_updates(exec, &writes.updates)
            })?;
            results.updates = Some(updates);
        }

        if let Some(reads) = &plan.reads {
            info!(count = reads.point.count, "running point-read workload");
            let point = self.run_step(WorkloadKind::PointReads, &results, |exec| {
                workload::run_point_reads(exec, &reads.point)
            })?;
            results.point_reads = Some(point);

            info!(queries = reads.range.queries, "running range-read workload");
            let range = self.run_step(WorkloadKind::RangeReads, &results, |exec| {
                workload::run_range_reads(exec, &reads.range)
            })?;
            results.range_reads = Some(range);
        }

        Ok(self.result_set(results))
    }

    fn run_step<T>(
        &self,
        kind: WorkloadKind,
        results: &WorkloadResults,
        step: impl FnOnce(&mut P::Exec) -> Result<T, BenchError>,
    ) -> Result<T, SessionError> {
        let attempt = (|| -> Result<T, BenchError> {
            let mut exec = self.provider.executor()?;
            step(&mut exec)
        })();
        attempt.map_err(|source| self.fail(kind, source, results))
    }

    fn fail(&self, kind: WorkloadKind, source: BenchError, results: &WorkloadResults) -> SessionError {
        SessionError {
            kind,
            source,
            partial: self.result_set(results.clone()),
        }
    }

    fn result_set(&self, results: WorkloadResults) -> ResultSet {
        ResultSet {
            label: self.label.clone(),
            host: self.host.clone(),
            database: self.database.clone(),
            timestamp: self.timestamp.clone(),
            results,
        }
    }
}
