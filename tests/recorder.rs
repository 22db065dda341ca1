//! Persistence round-trips for result files.

use mysql_perf::recorder;
use mysql_perf::schema::{ResultSet, UpdateResult, WorkloadResults};
use tempfile::tempdir;

fn sample_set() -> ResultSet {
    let results = WorkloadResults {
        updates: Some(UpdateResult {
            total_time_sec: 1.23,
            records: 500,
            tps: 406.5,
            avg_latency_ms: 2.41,
            p95_latency_ms: 5.0,
        }),
        ..Default::default()
    };
    ResultSet {
        label: "A".to_string(),
        host: "db.example.com".to_string(),
        database: "perftest".to_string(),
        timestamp: "2026-08-07T00:00:00Z".to_string(),
        results,
    }
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.json");

    let saved_to = recorder::save_result_set(&sample_set(), Some(&path)).unwrap();
    assert_eq!(saved_to, path);

    let loaded = recorder::load_result_set(&path).unwrap();
    assert_eq!(loaded.label, "A");
    assert_eq!(loaded.timestamp, "2026-08-07T00:00:00Z");

    let updates = loaded.results.updates.unwrap();
    assert_eq!(updates.records, 500);
    assert!((updates.tps - 406.5).abs() < 1e-9);
    assert!(loaded.results.single_inserts.is_none());
}

#[test]
fn save_creates_missing_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("run.json");

    recorder::save_result_set(&sample_set(), Some(&path)).unwrap();
    assert!(path.exists());
}

#[test]
fn absent_workloads_are_omitted_from_json() {
    let value = serde_json::to_value(sample_set()).unwrap();
    let results = value.get("results").unwrap().as_object().unwrap();
    assert_eq!(results.len(), 1);
    assert!(results.contains_key("updates"));
}

#[test]
fn loading_garbage_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(recorder::load_result_set(&path).is_err());
}
