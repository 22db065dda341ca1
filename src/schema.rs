//! Shared result and comparison types.
//!
//! Benchmark runs serialize a `ResultSet` to a JSON file so runs against
//! different servers can be compared later with `bench-compare`. Each
//! workload kind has a fixed result struct; the set of metrics that
//! participate in comparison is part of the type, not a runtime lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rounds a metric for storage; every stored metric carries 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The six fixed workload categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    SingleInserts,
    BatchInserts,
    ConcurrentWrites,
    Updates,
    PointReads,
    RangeReads,
}

impl WorkloadKind {
    /// Every kind, in session execution order.
    pub const ALL: [WorkloadKind; 6] = [
        WorkloadKind::SingleInserts,
        WorkloadKind::BatchInserts,
        WorkloadKind::ConcurrentWrites,
        WorkloadKind::Updates,
        WorkloadKind::PointReads,
        WorkloadKind::RangeReads,
    ];

    /// Write kinds contributing to the aggregate TPS summary.
    pub const WRITES: [WorkloadKind; 4] = [
        WorkloadKind::SingleInserts,
        WorkloadKind::BatchInserts,
        WorkloadKind::ConcurrentWrites,
        WorkloadKind::Updates,
    ];

    /// Read kinds contributing to the aggregate QPS summary.
    pub const READS: [WorkloadKind; 2] = [WorkloadKind::PointReads, WorkloadKind::RangeReads];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadKind::SingleInserts => "single_inserts",
            WorkloadKind::BatchInserts => "batch_inserts",
            WorkloadKind::ConcurrentWrites => "concurrent_writes",
            WorkloadKind::Updates => "updates",
            WorkloadKind::PointReads => "point_reads",
            WorkloadKind::RangeReads => "range_reads",
        }
    }

    /// Section heading used in rendered reports.
    pub fn title(self) -> &'static str {
        match self {
            WorkloadKind::SingleInserts => "SINGLE INSERT OPERATIONS",
            WorkloadKind::BatchInserts => "BATCH INSERT OPERATIONS",
            WorkloadKind::ConcurrentWrites => "CONCURRENT WRITE OPERATIONS",
            WorkloadKind::Updates => "UPDATE OPERATIONS",
            WorkloadKind::PointReads => "POINT READ OPERATIONS",
            WorkloadKind::RangeReads => "RANGE READ OPERATIONS",
        }
    }

    pub fn is_write(self) -> bool {
        matches!(
            self,
            WorkloadKind::SingleInserts
                | WorkloadKind::BatchInserts
                | WorkloadKind::ConcurrentWrites
                | WorkloadKind::Updates
        )
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individual INSERT statements at a configurable commit cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleInsertResult {
    pub total_time_sec: f64,
    pub records: usize,
    pub tps: f64,
    pub avg_latency_ms: f64,
    pub median_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub commit_every: usize,
}

impl SingleInsertResult {
    pub fn comparison_metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("tps", self.tps),
            ("avg_latency_ms", self.avg_latency_ms),
            ("median_latency_ms", self.median_latency_ms),
            ("p95_latency_ms", self.p95_latency_ms),
            ("p99_latency_ms", self.p99_latency_ms),
        ]
    }
}

/// Multi-row INSERT batches, one commit per batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchInsertResult {
    pub total_time_sec: f64,
    pub records: usize,
    pub batches: usize,
    pub batch_size: usize,
    pub tps: f64,
    pub avg_batch_latency_ms: f64,
    pub p95_batch_latency_ms: f64,
}

impl BatchInsertResult {
    pub fn comparison_metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("tps", self.tps),
            ("avg_batch_latency_ms", self.avg_batch_latency_ms),
            ("p95_batch_latency_ms", self.p95_batch_latency_ms),
        ]
    }
}

/// Parallel single-row inserts pooled across all workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrentWriteResult {
    pub total_time_sec: f64,
    pub records: usize,
    pub threads: usize,
    pub writes_per_thread: usize,
    pub tps: f64,
    pub avg_latency_ms: f64,
    pub median_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub max_latency_ms: f64,
    pub commit_every: usize,
}

impl ConcurrentWriteResult {
    pub fn comparison_metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("tps", self.tps),
            ("avg_latency_ms", self.avg_latency_ms),
            ("median_latency_ms", self.median_latency_ms),
            ("p95_latency_ms", self.p95_latency_ms),
            ("p99_latency_ms", self.p99_latency_ms),
        ]
    }
}

/// Single-row UPDATE statements against the indexed numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResult {
    pub total_time_sec: f64,
    pub records: usize,
    pub tps: f64,
    pub avg_latency_ms: f64,
    pub p95_latency_ms: f64,
}

impl UpdateResult {
    pub fn comparison_metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("tps", self.tps),
            ("avg_latency_ms", self.avg_latency_ms),
            ("p95_latency_ms", self.p95_latency_ms),
        ]
    }
}

/// Primary-key lookups across the populated id range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointReadResult {
    pub total_time_sec: f64,
    pub records: usize,
    pub qps: f64,
    pub avg_latency_ms: f64,
    pub median_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
}

impl PointReadResult {
    pub fn comparison_metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("qps", self.qps),
            ("avg_latency_ms", self.avg_latency_ms),
            ("median_latency_ms", self.median_latency_ms),
            ("p95_latency_ms", self.p95_latency_ms),
            ("p99_latency_ms", self.p99_latency_ms),
        ]
    }
}

/// Bounded scans with an advancing lower bound and a fixed row limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeReadResult {
    pub total_time_sec: f64,
    pub queries: usize,
    pub range_size: usize,
    pub qps: f64,
    pub avg_latency_ms: f64,
    pub p95_latency_ms: f64,
}

impl RangeReadResult {
    pub fn comparison_metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("qps", self.qps),
            ("avg_latency_ms", self.avg_latency_ms),
            ("p95_latency_ms", self.p95_latency_ms),
        ]
    }
}

/// Per-kind result slots; kinds that were not run are absent from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkloadResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_inserts: Option<SingleInsertResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_inserts: Option<BatchInsertResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrent_writes: Option<ConcurrentWriteResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates: Option<UpdateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_reads: Option<PointReadResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_reads: Option<RangeReadResult>,
}

impl WorkloadResults {
    pub fn contains(&self, kind: WorkloadKind) -> bool {
        self.comparison_metrics(kind).is_some()
    }

    pub fn is_empty(&self) -> bool {
        WorkloadKind::ALL.iter().all(|&kind| !self.contains(kind))
    }

    pub fn present_kinds(&self) -> Vec<WorkloadKind> {
        WorkloadKind::ALL
            .iter()
            .copied()
            .filter(|&kind| self.contains(kind))
            .collect()
    }

    /// The metrics a given kind contributes to comparison, if it was run.
    pub fn comparison_metrics(&self, kind: WorkloadKind) -> Option<Vec<(&'static str, f64)>> {
        match kind {
            WorkloadKind::SingleInserts => {
                self.single_inserts.as_ref().map(|r| r.comparison_metrics())
            }
            WorkloadKind::BatchInserts => {
                self.batch_inserts.as_ref().map(|r| r.comparison_metrics())
            }
            WorkloadKind::ConcurrentWrites => self
                .concurrent_writes
                .as_ref()
                .map(|r| r.comparison_metrics()),
            WorkloadKind::Updates => self.updates.as_ref().map(|r| r.comparison_metrics()),
            WorkloadKind::PointReads => self.point_reads.as_ref().map(|r| r.comparison_metrics()),
            WorkloadKind::RangeReads => self.range_reads.as_ref().map(|r| r.comparison_metrics()),
        }
    }

    /// TPS for write kinds, QPS for read kinds.
    pub fn throughput(&self, kind: WorkloadKind) -> Option<f64> {
        match kind {
            WorkloadKind::SingleInserts => self.single_inserts.as_ref().map(|r| r.tps),
            WorkloadKind::BatchInserts => self.batch_inserts.as_ref().map(|r| r.tps),
            WorkloadKind::ConcurrentWrites => self.concurrent_writes.as_ref().map(|r| r.tps),
            WorkloadKind::Updates => self.updates.as_ref().map(|r| r.tps),
            WorkloadKind::PointReads => self.point_reads.as_ref().map(|r| r.qps),
            WorkloadKind::RangeReads => self.range_reads.as_ref().map(|r| r.qps),
        }
    }
}

/// One benchmark run against one target, as persisted to JSON.
///
/// Produced once per run and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    pub label: String,
    pub host: String,
    pub database: String,
    pub timestamp: String,
    pub results: WorkloadResults,
}

/// Which side of a comparison performed better on a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    None,
}

/// One metric compared across both sides.
///
/// `difference_pct` is the absolute percentage difference relative to side B;
/// no winner is declared below the significance threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: String,
    pub value_a: f64,
    pub value_b: f64,
    pub difference_pct: f64,
    pub winner: Winner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadComparison {
    pub kind: WorkloadKind,
    pub metrics: Vec<MetricComparison>,
}

/// Identity of one compared run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideInfo {
    pub label: String,
    pub host: String,
    pub database: String,
    pub timestamp: String,
}

/// Aggregate winner with its margin relative to the losing side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AggregateWinner {
    pub winner: Winner,
    pub margin_pct: f64,
}

/// Paired write/read throughput averages over the kinds both sides ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub write_tests: Vec<WorkloadKind>,
    pub read_tests: Vec<WorkloadKind>,
    pub avg_write_throughput_a: f64,
    pub avg_write_throughput_b: f64,
    pub avg_read_throughput_a: f64,
    pub avg_read_throughput_b: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_winner: Option<AggregateWinner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_winner: Option<AggregateWinner>,
}

/// Full comparison of two result sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub generated_at: String,
    pub threshold_pct: f64,
    pub side_a: SideInfo,
    pub side_b: SideInfo,
    pub workloads: Vec<WorkloadComparison>,
    pub summary: ComparisonSummary,
}
