//! Workload benchmarks and result comparison for MySQL.
//!
//! The `mysql-perf` binary drives write and read workloads (single inserts,
//! batched inserts, concurrent writes, updates, point reads, range reads)
//! against a live server, records per-operation latency, and persists a JSON
//! result record. `bench-compare` consumes two such records and renders the
//! performance deltas.

pub mod compare;
pub mod db;
pub mod error;
pub mod executor;
pub mod recorder;
pub mod report;
pub mod schema;
pub mod session;
pub mod stats;
pub mod workload;
