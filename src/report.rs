//! Console and markdown renderings of comparison reports and run summaries.

use crate::schema::{ComparisonReport, ResultSet, Winner, WorkloadKind};

fn metric_display_name(metric: &str) -> &str {
    match metric {
        "tps" => "Throughput (TPS)",
        "qps" => "Throughput (QPS)",
        "avg_latency_ms" => "Avg Latency (ms)",
        "median_latency_ms" => "Median Latency (ms)",
        "p95_latency_ms" => "P95 Latency (ms)",
        "p99_latency_ms" => "P99 Latency (ms)",
        "avg_batch_latency_ms" => "Avg Batch Latency (ms)",
        "p95_batch_latency_ms" => "P95 Batch Latency (ms)",
        "total_time_sec" => "Total Time (sec)",
        other => other,
    }
}

fn winner_label<'a>(winner: Winner, report: &'a ComparisonReport) -> &'a str {
    match winner {
        Winner::A => &report.side_a.label,
        Winner::B => &report.side_b.label,
        Winner::None => "",
    }
}

fn throughput_unit(kind: WorkloadKind) -> &'static str {
    if kind.is_write() {
        "TPS"
    } else {
        "QPS"
    }
}

/// Console table rendering of a comparison report.
pub fn render_table(report: &ComparisonReport) -> String {
    let rule = "=".repeat(90);
    let mut out: Vec<String> = Vec::new();

    out.push(rule.clone());
    out.push("MYSQL PERFORMANCE COMPARISON".to_string());
    out.push(rule.clone());

    out.push(format!(
        "\nDatabase A: {} ({})",
        report.side_a.label, report.side_a.host
    ));
    out.push(format!("  Database: {}", report.side_a.database));
    out.push(format!("  Tested: {}", report.side_a.timestamp));

    out.push(format!(
        "\nDatabase B: {} ({})",
        report.side_b.label, report.side_b.host
    ));
    out.push(format!("  Database: {}", report.side_b.database));
    out.push(format!("  Tested: {}", report.side_b.timestamp));

    for comparison in &report.workloads {
        out.push(format!("\n{rule}"));
        out.push(comparison.kind.title().to_string());
        out.push(rule.clone());

        out.push(format!(
            "\n{:<30} {:<20} {:<20} {:<20}",
            "Metric", report.side_a.label, report.side_b.label, "Difference"
        ));
        out.push("-".repeat(90));

        for metric in &comparison.metrics {
            out.push(format!(
                "{:<30} {:<20.2} {:<20.2} {:>7.2}% {}",
                metric_display_name(&metric.metric),
                metric.value_a,
                metric.value_b,
                metric.difference_pct,
                winner_label(metric.winner, report),
            ));
        }
    }

    let summary = &report.summary;
    out.push(format!("\n{rule}"));
    out.push("OVERALL SUMMARY".to_string());
    out.push(rule.clone());

    if !summary.write_tests.is_empty() {
        out.push("\nAverage Write Throughput:".to_string());
        out.push(format!(
            "  {}: {:.2} TPS",
            report.side_a.label, summary.avg_write_throughput_a
        ));
        out.push(format!(
            "  {}: {:.2} TPS",
            report.side_b.label, summary.avg_write_throughput_b
        ));
    }
    if !summary.read_tests.is_empty() {
        out.push("\nAverage Read Throughput:".to_string());
        out.push(format!(
            "  {}: {:.2} QPS",
            report.side_a.label, summary.avg_read_throughput_a
        ));
        out.push(format!(
            "  {}: {:.2} QPS",
            report.side_b.label, summary.avg_read_throughput_b
        ));
    }

    out.push(format!("\n{rule}"));
    if let Some(winner) = &summary.write_winner {
        out.push(format!(
            "WINNER: {} has BETTER WRITE PERFORMANCE by {:.2}%",
            winner_label(winner.winner, report),
            winner.margin_pct
        ));
    }
    if let Some(winner) = &summary.read_winner {
        out.push(format!(
            "WINNER: {} has BETTER READ PERFORMANCE by {:.2}%",
            winner_label(winner.winner, report),
            winner.margin_pct
        ));
    }
    out.push(rule);

    out.push("\nKEY TAKEAWAYS:".to_string());
    out.extend(key_takeaways(report));

    out.join("\n")
}

fn key_takeaways(report: &ComparisonReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, comparison) in report.workloads.iter().enumerate() {
        let Some(throughput) = comparison.metrics.first() else {
            continue;
        };
        lines.push(format!("\n{}. {}:", i + 1, comparison.kind.title()));
        lines.push(format!(
            "   {}: {:.2} {}",
            report.side_a.label,
            throughput.value_a,
            throughput_unit(comparison.kind)
        ));
        lines.push(format!(
            "   {}: {:.2} {}",
            report.side_b.label,
            throughput.value_b,
            throughput_unit(comparison.kind)
        ));
        if throughput.winner != Winner::None {
            lines.push(format!(
                "   -> {} is {:.1}% ahead",
                winner_label(throughput.winner, report),
                throughput.difference_pct
            ));
        }
    }
    lines
}

/// GitHub-flavored markdown rendering of a comparison report.
pub fn render_markdown(report: &ComparisonReport) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push("# MySQL Performance Comparison\n".to_string());

    out.push("## Test Information\n".to_string());
    out.push(format!(
        "**Database A:** {} (`{}`)",
        report.side_a.label, report.side_a.host
    ));
    out.push(format!("- Database: `{}`", report.side_a.database));
    out.push(format!("- Tested: {}\n", report.side_a.timestamp));

    out.push(format!(
        "**Database B:** {} (`{}`)",
        report.side_b.label, report.side_b.host
    ));
    out.push(format!("- Database: `{}`", report.side_b.database));
    out.push(format!("- Tested: {}\n", report.side_b.timestamp));

    for comparison in &report.workloads {
        out.push(format!("## {}\n", comparison.kind.title()));
        out.push(format!(
            "| Metric | {} | {} | Difference | Winner |",
            report.side_a.label, report.side_b.label
        ));
        out.push(format!("|--------|{}", "----------|".repeat(4)));

        for metric in &comparison.metrics {
            out.push(format!(
                "| {} | {:.2} | {:.2} | {:.2}% | {} |",
                metric_display_name(&metric.metric),
                metric.value_a,
                metric.value_b,
                metric.difference_pct,
                winner_label(metric.winner, report),
            ));
        }
        out.push(String::new());
    }

    let summary = &report.summary;
    out.push("## Overall Summary\n".to_string());

    if !summary.write_tests.is_empty() {
        out.push("### Write Performance\n".to_string());
        out.push(format!(
            "- **{}:** {:.2} TPS",
            report.side_a.label, summary.avg_write_throughput_a
        ));
        out.push(format!(
            "- **{}:** {:.2} TPS\n",
            report.side_b.label, summary.avg_write_throughput_b
        ));
    }
    if !summary.read_tests.is_empty() {
        out.push("### Read Performance\n".to_string());
        out.push(format!(
            "- **{}:** {:.2} QPS",
            report.side_a.label, summary.avg_read_throughput_a
        ));
        out.push(format!(
            "- **{}:** {:.2} QPS\n",
            report.side_b.label, summary.avg_read_throughput_b
        ));
    }

    out.push("## Winner\n".to_string());
    if let Some(winner) = &summary.write_winner {
        out.push(format!(
            "**{}** has better write performance by **{:.2}%**\n",
            winner_label(winner.winner, report),
            winner.margin_pct
        ));
    }
    if let Some(winner) = &summary.read_winner {
        out.push(format!(
            "**{}** has better read performance by **{:.2}%**\n",
            winner_label(winner.winner, report),
            winner.margin_pct
        ));
    }

    out.join("\n")
}

/// Console digest printed after a benchmark session.
pub fn render_run_summary(set: &ResultSet) -> String {
    let rule = "=".repeat(60);
    let mut out: Vec<String> = Vec::new();

    out.push(rule.clone());
    out.push(format!("TEST SUMMARY - {}", set.label));
    out.push(rule);

    let results = &set.results;
    if let Some(r) = &results.single_inserts {
        out.push("\nSingle Inserts:".to_string());
        out.push(format!("  TPS: {:.2}", r.tps));
        out.push(format!("  Avg Latency: {:.2} ms", r.avg_latency_ms));
        out.push(format!("  P95 Latency: {:.2} ms", r.p95_latency_ms));
    }
    if let Some(r) = &results.batch_inserts {
        out.push("\nBatch Inserts:".to_string());
        out.push(format!("  TPS: {:.2}", r.tps));
        out.push(format!("  Avg Batch Time: {:.2} ms", r.avg_batch_latency_ms));
    }
    if let Some(r) = &results.concurrent_writes {
        out.push("\nConcurrent Writes:".to_string());
        out.push(format!("  TPS: {:.2}", r.tps));
        out.push(format!("  Avg Latency: {:.2} ms", r.avg_latency_ms));
        out.push(format!("  P95 Latency: {:.2} ms", r.p95_latency_ms));
    }
    if let Some(r) = &results.updates {
        out.push("\nUpdates:".to_string());
        out.push(format!("  TPS: {:.2}", r.tps));
        out.push(format!("  Avg Latency: {:.2} ms", r.avg_latency_ms));
    }
    if let Some(r) = &results.point_reads {
        out.push("\nPoint Reads:".to_string());
        out.push(format!("  QPS: {:.2}", r.qps));
        out.push(format!("  Avg Latency: {:.2} ms", r.avg_latency_ms));
        out.push(format!("  P95 Latency: {:.2} ms", r.p95_latency_ms));
    }
    if let Some(r) = &results.range_reads {
        out.push("\nRange Reads:".to_string());
        out.push(format!("  QPS: {:.2}", r.qps));
        out.push(format!("  Avg Latency: {:.2} ms", r.avg_latency_ms));
    }

    out.join("\n")
}
