//! Benchmark comparison tool.
//!
//! Compares two JSON result files produced by `mysql-perf` and renders the
//! performance deltas as a console table, markdown, or JSON.
//!
//! Usage: `bench-compare <result_a.json> <result_b.json> [--format markdown]`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use mysql_perf::compare::{self, DEFAULT_THRESHOLD_PCT};
use mysql_perf::recorder::{self, OUTPUT_DIR};
use mysql_perf::report;

#[derive(Parser, Debug)]
#[command(name = "bench-compare", about = "Compare two MySQL benchmark result files")]
struct Args {
    /// First JSON result file.
    file1: PathBuf,

    /// Second JSON result file.
    file2: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Output file (default: stdout). Bare filenames land in output/.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Custom label for the first result.
    #[arg(long)]
    label1: Option<String>,

    /// Custom label for the second result.
    #[arg(long)]
    label2: Option<String>,

    /// Significance threshold percentage for per-metric winners.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD_PCT)]
    threshold: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Markdown,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut side_a = recorder::load_result_set(&args.file1)
        .with_context(|| format!("failed to load {}", args.file1.display()))?;
    let mut side_b = recorder::load_result_set(&args.file2)
        .with_context(|| format!("failed to load {}", args.file2.display()))?;

    if let Some(label) = args.label1 {
        side_a.label = label;
    }
    if let Some(label) = args.label2 {
        side_b.label = label;
    }

    let report = compare::compare(&side_a, &side_b, args.threshold);

    let rendered = match args.format {
        Format::Table => report::render_table(&report),
        Format::Markdown => report::render_markdown(&report),
        Format::Json => serde_json::to_string_pretty(&report)?,
    };

    match args.output {
        Some(path) => {
            // Bare filenames are collected under output/, next to the runner's
            // result files.
            let path = if path.parent().map_or(true, |p| p.as_os_str().is_empty()) {
                fs::create_dir_all(OUTPUT_DIR)?;
                PathBuf::from(OUTPUT_DIR).join(path)
            } else {
                path
            };
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Comparison saved to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
