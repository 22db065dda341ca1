//! Workload runners and the concurrent-write dispatcher.
//!
//! Each runner drives one workload kind through a [`StatementExecutor`],
//! timing exactly the statement-execution calls, and derives throughput from
//! the full wall time of the run (latencies overlap with commit batching and
//! must not be summed for a rate).

use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use mysql::Params;
use tracing::{debug, warn};

use crate::error::BenchError;
use crate::executor::{ExecutorProvider, StatementExecutor};
use crate::schema::{
    round2, BatchInsertResult, ConcurrentWriteResult, PointReadResult, RangeReadResult,
    SingleInsertResult, UpdateResult,
};
use crate::stats::LatencySample;

pub const INSERT_SQL: &str =
    "INSERT INTO perf_test_writes (test_data, numeric_value) VALUES (?, ?)";
pub const UPDATE_SQL: &str =
    "UPDATE perf_test_writes SET test_data = ? WHERE numeric_value = ?";
pub const POINT_READ_SQL: &str =
    "SELECT id, test_data, numeric_value FROM perf_test_writes WHERE id = ?";
pub const RANGE_READ_SQL: &str =
    "SELECT id, test_data, numeric_value FROM perf_test_writes WHERE numeric_value >= ? LIMIT ?";

/// Lower-bound advance per range-read iteration.
const RANGE_STRIDE: usize = 10;

fn positive(name: &'static str, value: usize) -> Result<(), BenchError> {
    if value == 0 {
        return Err(BenchError::InvalidParameter(name));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct SingleInsertParams {
    pub count: usize,
    pub commit_every: usize,
}

impl SingleInsertParams {
    pub fn validate(&self) -> Result<(), BenchError> {
        positive("single_inserts", self.count)?;
        positive("commit_every", self.commit_every)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchInsertParams {
    pub batches: usize,
    pub batch_size: usize,
}

impl BatchInsertParams {
    pub fn validate(&self) -> Result<(), BenchError> {
        positive("batch_count", self.batches)?;
        positive("batch_size", self.batch_size)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConcurrentWriteParams {
    pub workers: usize,
    pub writes_per_worker: usize,
    pub commit_every: usize,
}

impl ConcurrentWriteParams {
    pub fn validate(&self) -> Result<(), BenchError> {
        positive("threads", self.workers)?;
        positive("writes_per_thread", self.writes_per_worker)?;
        positive("commit_every", self.commit_every)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateParams {
    pub count: usize,
}

impl UpdateParams {
    pub fn validate(&self) -> Result<(), BenchError> {
        positive("updates", self.count)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PointReadParams {
    pub count: usize,
}

impl PointReadParams {
    pub fn validate(&self) -> Result<(), BenchError> {
        positive("read_queries", self.count)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RangeReadParams {
    pub queries: usize,
    pub range_size: usize,
}

impl RangeReadParams {
    pub fn validate(&self) -> Result<(), BenchError> {
        positive("range_queries", self.queries)?;
        positive("range_size", self.range_size)
    }
}

/// Runs `count` writes of `stmt`, committing every `commit_every` operations
/// and once more after the last one so nothing is left uncommitted. Latency
/// covers the statement call only.
fn timed_write_loop<E: StatementExecutor>(
    exec: &mut E,
    stmt: &str,
    count: usize,
    commit_every: usize,
    mut row: impl FnMut(usize) -> (String, u64),
) -> Result<LatencySample, BenchError> {
    let mut sample = LatencySample::with_capacity(count);
    let progress_step = (count / 10).max(1);

    for i in 0..count {
        let (data, numeric) = row(i);
        let started = Instant::now();
        exec.execute(stmt, (data, numeric).into())?;
        sample.record(started.elapsed());

        if (i + 1) % commit_every == 0 {
            exec.commit()?;
        }
        if (i + 1) % progress_step == 0 {
            debug!(done = i + 1, total = count, "write progress");
        }
    }
    exec.commit()?;
    Ok(sample)
}

/// Individual INSERT statements at the configured commit cadence.
pub fn run_single_inserts<E: StatementExecutor>(
    exec: &mut E,
    params: &SingleInsertParams,
) -> Result<SingleInsertResult, BenchError> {
    params.validate()?;

    let started = Instant::now();
    let sample = timed_write_loop(exec, INSERT_SQL, params.count, params.commit_every, |i| {
        (format!("test_data_{i}"), i as u64)
    })?;
    let elapsed = started.elapsed();
    let stats = sample.summarize()?;

    Ok(SingleInsertResult {
        total_time_sec: round2(elapsed.as_secs_f64()),
        records: params.count,
        tps: round2(params.count as f64 / elapsed.as_secs_f64()),
        avg_latency_ms: round2(stats.mean),
        median_latency_ms: round2(stats.median),
        p95_latency_ms: round2(stats.p95),
        p99_latency_ms: round2(stats.p99),
        min_latency_ms: round2(stats.min),
        max_latency_ms: round2(stats.max),
        commit_every: params.commit_every,
    })
}

/// Multi-row INSERT batches; each batch is one committed transaction and one
/// latency observation.
pub fn run_batch_inserts<E: StatementExecutor>(
    exec: &mut E,
    params: &BatchInsertParams,
) -> Result<BatchInsertResult, BenchError> {
    params.validate()?;

    let mut sample = LatencySample::with_capacity(params.batches);
    let progress_step = (params.batches / 10).max(1);
    let started = Instant::now();

    for batch in 0..params.batches {
        let rows: Vec<Params> = (0..params.batch_size)
            .map(|i| {
                (
                    format!("batch_data_{batch}_{i}"),
                    (batch * params.batch_size + i) as u64,
                )
                    .into()
            })
            .collect();

        let batch_started = Instant::now();
        exec.execute_batch(INSERT_SQL, rows)?;
        sample.record(batch_started.elapsed());
        exec.commit()?;

        if (batch + 1) % progress_step == 0 {
            debug!(done = batch + 1, total = params.batches, "batch progress");
        }
    }

    let elapsed = started.elapsed();
    let records = params.batches * params.batch_size;
    let stats = sample.summarize()?;

    Ok(BatchInsertResult {
        total_time_sec: round2(elapsed.as_secs_f64()),
        records,
        batches: params.batches,
        batch_size: params.batch_size,
        tps: round2(records as f64 / elapsed.as_secs_f64()),
        avg_batch_latency_ms: round2(stats.mean),
        p95_batch_latency_ms: round2(stats.p95),
    })
}

/// Fans the single-insert loop out across `workers` scoped threads, each with
/// its own executor, and merges the per-worker samples in completion order.
///
/// A failing worker is logged and contributes an empty sample; siblings keep
/// running. Statistics are computed over the pooled sample only, never
/// per-worker, and throughput spans dispatch start to last worker completion.
pub fn run_concurrent_writes<P>(
    provider: &P,
    params: &ConcurrentWriteParams,
) -> Result<ConcurrentWriteResult, BenchError>
where
    P: ExecutorProvider + Sync,
{
    params.validate()?;

    let started = Instant::now();
    let (tx, rx) = mpsc::channel::<LatencySample>();

    thread::scope(|scope| {
        for worker in 0..params.workers {
            let tx = tx.clone();
            let params = *params;
            scope.spawn(move || {
                let sample = match worker_writes(provider, worker, &params) {
                    Ok(sample) => sample,
                    Err(error) => {
                        warn!(worker, %error, "concurrent worker failed");
                        LatencySample::new()
                    }
                };
                let _ = tx.send(sample);
            });
        }
    });
    drop(tx);

    let mut merged = LatencySample::new();
    for sample in rx {
        merged.merge(sample);
    }
    let elapsed = started.elapsed();

    if merged.is_empty() {
        return Err(BenchError::NoSuccessfulWorkers(params.workers));
    }

    let records = merged.len();
    let stats = merged.summarize()?;

    Ok(ConcurrentWriteResult {
        total_time_sec: round2(elapsed.as_secs_f64()),
        records,
        threads: params.workers,
        writes_per_thread: params.writes_per_worker,
        tps: round2(records as f64 / elapsed.as_secs_f64()),
        avg_latency_ms: round2(stats.mean),
        median_latency_ms: round2(stats.median),
        p95_latency_ms: round2(stats.p95),
        p99_latency_ms: round2(stats.p99),
        max_latency_ms: round2(stats.max),
        commit_every: params.commit_every,
    })
}

fn worker_writes<P: ExecutorProvider>(
    provider: &P,
    worker: usize,
    params: &ConcurrentWriteParams,
) -> Result<LatencySample, BenchError> {
    let mut exec = provider.executor()?;
    timed_write_loop(
        &mut exec,
        INSERT_SQL,
        params.writes_per_worker,
        params.commit_every,
        |i| {
            (
                format!("thread_{worker}_data_{i}"),
                (worker * 10_000 + i) as u64,
            )
        },
    )
}

/// Single-row UPDATEs against the indexed numeric column, committed per
/// statement. Expects rows from an earlier insert workload.
pub fn run_updates<E: StatementExecutor>(
    exec: &mut E,
    params: &UpdateParams,
) -> Result<UpdateResult, BenchError> {
    params.validate()?;

    let started = Instant::now();
    let sample = timed_write_loop(exec, UPDATE_SQL, params.count, 1, |i| {
        (format!("updated_data_{i}"), i as u64)
    })?;
    let elapsed = started.elapsed();
    let stats = sample.summarize()?;

    Ok(UpdateResult {
        total_time_sec: round2(elapsed.as_secs_f64()),
        records: params.count,
        tps: round2(params.count as f64 / elapsed.as_secs_f64()),
        avg_latency_ms: round2(stats.mean),
        p95_latency_ms: round2(stats.p95),
    })
}

/// Primary-key lookups walking the populated id range deterministically.
pub fn run_point_reads<E: StatementExecutor>(
    exec: &mut E,
    params: &PointReadParams,
) -> Result<PointReadResult, BenchError> {
    params.validate()?;

    let (min_id, max_id) = exec.key_bounds()?.ok_or(BenchError::NoData)?;
    let span = max_id - min_id + 1;
    debug!(min_id, max_id, "point-read key range");

    let mut sample = LatencySample::with_capacity(params.count);
    let progress_step = (params.count / 10).max(1);
    let started = Instant::now();

    for i in 0..params.count {
        let id = min_id + (i as u64 % span);
        let fetch_started = Instant::now();
        exec.fetch(POINT_READ_SQL, (id,).into())?;
        sample.record(fetch_started.elapsed());

        if (i + 1) % progress_step == 0 {
            debug!(done = i + 1, total = params.count, "point-read progress");
        }
    }

    let elapsed = started.elapsed();
    let stats = sample.summarize()?;

    Ok(PointReadResult {
        total_time_sec: round2(elapsed.as_secs_f64()),
        records: params.count,
        qps: round2(params.count as f64 / elapsed.as_secs_f64()),
        avg_latency_ms: round2(stats.mean),
        median_latency_ms: round2(stats.median),
        p95_latency_ms: round2(stats.p95),
        p99_latency_ms: round2(stats.p99),
        min_latency_ms: round2(stats.min),
        max_latency_ms: round2(stats.max),
    })
}

/// Bounded scans with a lower bound advancing by a fixed stride per query.
/// Queries past the largest key simply return fewer or zero rows.
pub fn run_range_reads<E: StatementExecutor>(
    exec: &mut E,
    params: &RangeReadParams,
) -> Result<RangeReadResult, BenchError> {
    params.validate()?;

    let mut sample = LatencySample::with_capacity(params.queries);
    let progress_step = (params.queries / 10).max(1);
    let started = Instant::now();

    for i in 0..params.queries {
        let bound = (i * RANGE_STRIDE) as u64;
        let fetch_started = Instant::now();
        exec.fetch(RANGE_READ_SQL, (bound, params.range_size as u64).into())?;
        sample.record(fetch_started.elapsed());

        if (i + 1) % progress_step == 0 {
            debug!(done = i + 1, total = params.queries, "range-read progress");
        }
    }

    let elapsed = started.elapsed();
    let stats = sample.summarize()?;

    Ok(RangeReadResult {
        total_time_sec: round2(elapsed.as_secs_f64()),
        queries: params.queries,
        range_size: params.range_size,
        qps: round2(params.queries as f64 / elapsed.as_secs_f64()),
        avg_latency_ms: round2(stats.mean),
        p95_latency_ms: round2(stats.p95),
    })
}
