//! Black-box tests for the latency statistics kernel.

use std::time::Duration;

use mysql_perf::error::BenchError;
use mysql_perf::stats::LatencySample;

const EPS: f64 = 1e-9;

fn sample_from_ms(values: &[f64]) -> LatencySample {
    let mut sample = LatencySample::new();
    for &ms in values {
        sample.record(Duration::from_secs_f64(ms / 1000.0));
    }
    sample
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn empty_sample_is_an_error() {
    let sample = LatencySample::new();
    assert!(matches!(sample.summarize(), Err(BenchError::EmptySample)));
}

#[test]
fn single_element_sample_collapses_to_that_element() {
    let stats = sample_from_ms(&[42.0]).summarize().unwrap();
    for value in [
        stats.mean,
        stats.median,
        stats.p95,
        stats.p99,
        stats.min,
        stats.max,
    ] {
        assert!((value - 42.0).abs() < EPS);
    }
}

// =============================================================================
// Mean and median
// =============================================================================

#[test]
fn mean_and_median_even_sample() {
    let stats = sample_from_ms(&[4.0, 1.0, 3.0, 2.0]).summarize().unwrap();
    assert!((stats.mean - 2.5).abs() < EPS);
    assert!((stats.median - 2.5).abs() < EPS);
}

#[test]
fn median_odd_sample_is_middle_element() {
    let stats = sample_from_ms(&[9.0, 1.0, 5.0]).summarize().unwrap();
    assert!((stats.median - 5.0).abs() < EPS);
}

#[test]
fn insertion_order_does_not_affect_statistics() {
    let a = sample_from_ms(&[1.0, 2.0, 3.0, 4.0, 5.0]).summarize().unwrap();
    let b = sample_from_ms(&[5.0, 3.0, 1.0, 4.0, 2.0]).summarize().unwrap();
    assert!((a.median - b.median).abs() < EPS);
    assert!((a.p95 - b.p95).abs() < EPS);
    assert!((a.min - b.min).abs() < EPS);
    assert!((a.max - b.max).abs() < EPS);
}

// =============================================================================
// Quantile monotonicity
// =============================================================================

#[test]
fn quantiles_are_monotonic_small_sample() {
    let stats = sample_from_ms(&[5.0, 1.0, 9.0, 3.0, 7.0, 2.0, 8.0])
        .summarize()
        .unwrap();
    assert!(stats.min <= stats.median);
    assert!(stats.median <= stats.max);
    assert!(stats.p95 <= stats.p99);
    assert!(stats.p99 <= stats.max);
}

#[test]
fn quantiles_are_monotonic_large_sample() {
    let values: Vec<f64> = (1..=500).map(|i| (i % 37) as f64 + 0.5).collect();
    let stats = sample_from_ms(&values).summarize().unwrap();
    assert!(stats.min <= stats.median);
    assert!(stats.median <= stats.max);
    assert!(stats.p95 <= stats.p99);
    assert!(stats.p99 <= stats.max);
    assert!(stats.min <= stats.mean && stats.mean <= stats.max);
}

// =============================================================================
// Method agreement at the small/large-sample boundary
// =============================================================================

#[test]
fn smoothed_and_nearest_rank_agree_within_one_rank_at_100() {
    let values: Vec<f64> = (1..=100).map(|i| i as f64).collect();
    let stats = sample_from_ms(&values).summarize().unwrap();

    // Interpolated cut points for 1..=100.
    assert!((stats.p95 - 95.95).abs() < 1e-6);
    assert!((stats.p99 - 99.99).abs() < 1e-6);

    // Nearest rank would give 96 and 100; both within one rank position.
    assert!((stats.p95 - 96.0).abs() <= 1.0);
    assert!((stats.p99 - 100.0).abs() <= 1.0);
}

#[test]
fn nearest_rank_below_the_boundary() {
    let values: Vec<f64> = (1..=99).map(|i| i as f64).collect();
    let stats = sample_from_ms(&values).summarize().unwrap();

    // floor(99 * 0.95) = 94 -> 95.0; floor(99 * 0.99) = 98 -> 99.0.
    assert!((stats.p95 - 95.0).abs() < 1e-6);
    assert!((stats.p99 - 99.0).abs() < 1e-6);
}

// =============================================================================
// Merging
// =============================================================================

#[test]
fn merged_samples_pool_every_observation() {
    let mut merged = LatencySample::new();
    merged.merge(sample_from_ms(&[1.0, 2.0]));
    merged.merge(sample_from_ms(&[3.0]));
    merged.merge(LatencySample::new());
    assert_eq!(merged.len(), 3);

    let stats = merged.summarize().unwrap();
    assert!((stats.mean - 2.0).abs() < EPS);
    assert!((stats.max - 3.0).abs() < EPS);
}
