//! Black-box tests for session orchestration: ordering, abort semantics,
//! and run metadata.

mod common;

use common::MockProvider;
use mysql_perf::schema::WorkloadKind;
use mysql_perf::session::{BenchmarkSession, ReadPlan, SessionPlan, WritePlan};
use mysql_perf::workload::{
    BatchInsertParams, ConcurrentWriteParams, PointReadParams, RangeReadParams,
    SingleInsertParams, UpdateParams,
};

fn full_plan() -> SessionPlan {
    SessionPlan {
        writes: Some(WritePlan {
            single: SingleInsertParams {
                count: 4,
                commit_every: 2,
            },
            batch: BatchInsertParams {
                batches: 2,
                batch_size: 3,
            },
            concurrent: ConcurrentWriteParams {
                workers: 2,
                writes_per_worker: 3,
                commit_every: 2,
            },
            updates: UpdateParams { count: 3 },
        }),
        reads: Some(ReadPlan {
            point: PointReadParams { count: 4 },
            range: RangeReadParams {
                queries: 2,
                range_size: 10,
            },
        }),
    }
}

// =============================================================================
// Full runs
// =============================================================================

#[test]
fn full_session_produces_all_six_results() {
    let provider = MockProvider::new();
    let session = BenchmarkSession::new(provider, "Local", "localhost", "perftest");

    let set = session.run(&full_plan()).unwrap();

    assert_eq!(set.label, "Local");
    assert_eq!(set.host, "localhost");
    assert_eq!(set.database, "perftest");
    assert!(!set.timestamp.is_empty());
    for kind in WorkloadKind::ALL {
        assert!(set.results.contains(kind), "missing {kind}");
    }
}

#[test]
fn workloads_run_in_fixed_order() {
    let provider = MockProvider::new();
    let log = provider.log();
    let session = BenchmarkSession::new(provider, "Local", "localhost", "perftest");

    session.run(&full_plan()).unwrap();

    let statements = log.statements.lock().unwrap();
    let first_insert = statements.iter().position(|s| s.starts_with("INSERT")).unwrap();
    let first_update = statements.iter().position(|s| s.starts_with("UPDATE")).unwrap();
    let first_point = statements.iter().position(|s| s.contains("WHERE id")).unwrap();
    let first_range = statements
        .iter()
        .position(|s| s.contains("numeric_value >="))
        .unwrap();

    assert!(first_insert < first_update);
    assert!(first_update < first_point);
    assert!(first_point < first_range);
}

#[test]
fn write_only_sessions_skip_reads() {
    let provider = MockProvider::new();
    let log = provider.log();
    let session = BenchmarkSession::new(provider, "Local", "localhost", "perftest");

    let plan = SessionPlan {
        reads: None,
        ..full_plan()
    };
    let set = session.run(&plan).unwrap();

    assert!(set.results.contains(WorkloadKind::SingleInserts));
    assert!(set.results.contains(WorkloadKind::Updates));
    assert!(!set.results.contains(WorkloadKind::PointReads));
    assert!(!set.results.contains(WorkloadKind::RangeReads));
    assert!(log
        .statements
        .lock()
        .unwrap()
        .iter()
        .all(|s| !s.starts_with("SELECT")));
}

#[test]
fn empty_plan_yields_an_empty_result_set() {
    let provider = MockProvider::new();
    let session = BenchmarkSession::new(provider, "Local", "localhost", "perftest");

    let set = session.run(&SessionPlan::default()).unwrap();
    assert!(set.results.is_empty());
}

// =============================================================================
// Abort semantics
// =============================================================================

#[test]
fn failure_aborts_remaining_workloads_and_keeps_partial_results() {
    let provider = MockProvider::new().with_fail_on("UPDATE");
    let log = provider.log();
    let session = BenchmarkSession::new(provider, "Local", "localhost", "perftest");

    let err = session.run(&full_plan()).unwrap_err();

    assert_eq!(err.kind, WorkloadKind::Updates);
    assert!(err.partial.results.contains(WorkloadKind::SingleInserts));
    assert!(err.partial.results.contains(WorkloadKind::BatchInserts));
    assert!(err.partial.results.contains(WorkloadKind::ConcurrentWrites));
    assert!(!err.partial.results.contains(WorkloadKind::Updates));
    assert!(!err.partial.results.contains(WorkloadKind::PointReads));

    // The read workloads never ran.
    assert!(log
        .statements
        .lock()
        .unwrap()
        .iter()
        .all(|s| !s.starts_with("SELECT")));
}

#[test]
fn partial_result_carries_run_metadata() {
    let provider = MockProvider::new().with_fail_on("UPDATE");
    let session = BenchmarkSession::new(provider, "Staging", "db.internal", "perftest");

    let err = session.run(&full_plan()).unwrap_err();
    assert_eq!(err.partial.label, "Staging");
    assert_eq!(err.partial.host, "db.internal");
    assert!(!err.partial.timestamp.is_empty());
}
