//! Comparison engine for two persisted result sets.
//!
//! Only workload kinds present in both inputs are compared; kinds run on one
//! side only are skipped. Per-metric winners are gated by the significance
//! threshold; the aggregate write/read winners are not, so the report always
//! states an overall direction.

use chrono::Utc;

use crate::schema::{
    round2, AggregateWinner, ComparisonReport, ComparisonSummary, MetricComparison, ResultSet,
    SideInfo, Winner, WorkloadComparison, WorkloadKind,
};

/// Default significance threshold, in percent.
pub const DEFAULT_THRESHOLD_PCT: f64 = 10.0;

/// Metrics whose name denotes a latency or elapsed time; lower wins.
fn lower_is_better(metric: &str) -> bool {
    metric.contains("latency") || metric.contains("time")
}

/// Absolute percentage difference of `a` relative to `b`, plus the winner.
///
/// `b == 0` yields 0% and no winner rather than dividing by zero. Below the
/// threshold no winner is declared regardless of which side is larger.
fn metric_comparison(
    metric: &str,
    value_a: f64,
    value_b: f64,
    threshold_pct: f64,
) -> MetricComparison {
    let (difference_pct, winner) = if value_b == 0.0 {
        (0.0, Winner::None)
    } else {
        let diff = ((value_a - value_b) / value_b * 100.0).abs();
        let winner = if diff >= threshold_pct {
            let a_wins = if lower_is_better(metric) {
                value_a < value_b
            } else {
                value_a > value_b
            };
            if a_wins {
                Winner::A
            } else {
                Winner::B
            }
        } else {
            Winner::None
        };
        (diff, winner)
    };

    MetricComparison {
        metric: metric.to_string(),
        value_a,
        value_b,
        difference_pct: round2(difference_pct),
        winner,
    }
}

/// Average throughput over the kinds present in both inputs; a kind missing
/// from either side is excluded from both averages so the summary stays
/// apples-to-apples.
fn paired_throughput_avg(
    a: &ResultSet,
    b: &ResultSet,
    kinds: &[WorkloadKind],
) -> (Vec<WorkloadKind>, f64, f64) {
    let mut present = Vec::new();
    let mut sum_a = 0.0;
    let mut sum_b = 0.0;

    for &kind in kinds {
        if let (Some(tput_a), Some(tput_b)) =
            (a.results.throughput(kind), b.results.throughput(kind))
        {
            present.push(kind);
            sum_a += tput_a;
            sum_b += tput_b;
        }
    }

    if present.is_empty() {
        (present, 0.0, 0.0)
    } else {
        let n = present.len() as f64;
        (present, sum_a / n, sum_b / n)
    }
}

/// Winner of two throughput averages, with the margin relative to the loser.
/// A zero losing average reports a zero margin; ties resolve to side B.
fn aggregate_winner(avg_a: f64, avg_b: f64) -> AggregateWinner {
    if avg_a > avg_b {
        let margin = if avg_b == 0.0 {
            0.0
        } else {
            (avg_a - avg_b) / avg_b * 100.0
        };
        AggregateWinner {
            winner: Winner::A,
            margin_pct: round2(margin),
        }
    } else {
        let margin = if avg_a == 0.0 {
            0.0
        } else {
            (avg_b - avg_a) / avg_a * 100.0
        };
        AggregateWinner {
            winner: Winner::B,
            margin_pct: round2(margin),
        }
    }
}

fn side_info(set: &ResultSet) -> SideInfo {
    SideInfo {
        label: set.label.clone(),
        host: set.host.clone(),
        database: set.database.clone(),
        timestamp: set.timestamp.clone(),
    }
}

/// Compares two result sets metric-by-metric at the given significance
/// threshold (percent).
pub fn compare(a: &ResultSet, b: &ResultSet, threshold_pct: f64) -> ComparisonReport {
    let mut workloads = Vec::new();
    for kind in WorkloadKind::ALL {
        let (Some(metrics_a), Some(metrics_b)) = (
            a.results.comparison_metrics(kind),
            b.results.comparison_metrics(kind),
        ) else {
            continue;
        };

        let metrics = metrics_a
            .iter()
            .zip(metrics_b.iter())
            .map(|((name, value_a), (_, value_b))| {
                metric_comparison(name, *value_a, *value_b, threshold_pct)
            })
            .collect();
        workloads.push(WorkloadComparison { kind, metrics });
    }

    let (write_tests, avg_write_a, avg_write_b) =
        paired_throughput_avg(a, b, &WorkloadKind::WRITES);
    let (read_tests, avg_read_a, avg_read_b) = paired_throughput_avg(a, b, &WorkloadKind::READS);

    let write_winner = (!write_tests.is_empty()).then(|| aggregate_winner(avg_write_a, avg_write_b));
    let read_winner = (!read_tests.is_empty()).then(|| aggregate_winner(avg_read_a, avg_read_b));

    ComparisonReport {
        generated_at: Utc::now().to_rfc3339(),
        threshold_pct,
        side_a: side_info(a),
        side_b: side_info(b),
        workloads,
        summary: ComparisonSummary {
            write_tests,
            read_tests,
            avg_write_throughput_a: round2(avg_write_a),
            avg_write_throughput_b: round2(avg_write_b),
            avg_read_throughput_a: round2(avg_read_a),
            avg_read_throughput_b: round2(avg_read_b),
            write_winner,
            read_winner,
        },
    }
}
