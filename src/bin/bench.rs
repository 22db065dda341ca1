//! MySQL performance benchmark runner.
//!
//! Drives single-insert, batch-insert, concurrent-write, update, point-read
//! and range-read workloads against a live server and writes a JSON result
//! record for later comparison with `bench-compare`.
//!
//! Credentials can come from flags or from the environment
//! (`MYSQL_HOST`, `MYSQL_USER`, `MYSQL_PASS`/`MYSQL_PASSWORD`, `MYSQL_DB`):
//!
//! ```text
//! export MYSQL_HOST=localhost MYSQL_USER=root MYSQL_PASS=secret
//! mysql-perf --label "Local-MySQL" --single-inserts 5000 --threads 20
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mysql_perf::db::{MysqlTarget, TargetConfig};
use mysql_perf::recorder;
use mysql_perf::report;
use mysql_perf::session::{BenchmarkSession, ReadPlan, SessionPlan, WritePlan};
use mysql_perf::workload::{
    BatchInsertParams, ConcurrentWriteParams, PointReadParams, RangeReadParams,
    SingleInsertParams, UpdateParams,
};

#[derive(Parser, Debug)]
#[command(name = "mysql-perf", about = "MySQL write/read performance benchmarks")]
struct Args {
    /// Database host.
    #[arg(long, env = "MYSQL_HOST")]
    host: Option<String>,

    /// Database port.
    #[arg(long, default_value_t = 3306)]
    port: u16,

    /// Database user.
    #[arg(long, env = "MYSQL_USER")]
    user: Option<String>,

    /// Database password (prefer the environment variable over the flag).
    #[arg(long = "pass", env = "MYSQL_PASS")]
    password: Option<String>,

    /// Database name.
    #[arg(long = "db", env = "MYSQL_DB", default_value = "perftest")]
    database: String,

    /// Label for this run (e.g. "EC2-MySQL", "RDS-MySQL").
    #[arg(long, default_value = "MySQL")]
    label: String,

    /// Path to a CA certificate for TLS connections.
    #[arg(long)]
    ssl_ca: Option<PathBuf>,

    /// Connection pool size.
    #[arg(long, default_value_t = 10)]
    pool_size: usize,

    /// Connection timeout in seconds.
    #[arg(long, default_value_t = 10)]
    connect_timeout: u64,

    /// Number of single inserts.
    #[arg(long, default_value_t = 1000)]
    single_inserts: usize,

    /// Commit every N inserts in the single-insert workload.
    #[arg(long, default_value_t = 1)]
    commit_every: usize,

    /// Number of insert batches.
    #[arg(long, default_value_t = 100)]
    batch_count: usize,

    /// Records per batch.
    #[arg(long, default_value_t = 100)]
    batch_size: usize,

    /// Concurrent writer threads.
    #[arg(long, default_value_t = 10)]
    threads: usize,

    /// Writes per thread in the concurrent workload.
    #[arg(long, default_value_t = 100)]
    writes_per_thread: usize,

    /// Commit every N inserts per thread in the concurrent workload.
    #[arg(long, default_value_t = 10)]
    concurrent_commit_every: usize,

    /// Number of point-read queries.
    #[arg(long, default_value_t = 1000)]
    read_queries: usize,

    /// Number of range queries.
    #[arg(long, default_value_t = 100)]
    range_queries: usize,

    /// Rows per range query (LIMIT).
    #[arg(long, default_value_t = 100)]
    range_size: usize,

    /// Skip write workloads.
    #[arg(long)]
    skip_writes: bool,

    /// Skip read workloads.
    #[arg(long)]
    skip_reads: bool,

    /// Only test the connection and exit.
    #[arg(long)]
    test_connection_only: bool,

    /// Output JSON path (default: auto-generated under output/).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Keep the test table after the run.
    #[arg(long)]
    no_cleanup: bool,

    /// Skip the confirmation prompt.
    #[arg(long, short)]
    yes: bool,
}

fn build_plan(args: &Args) -> SessionPlan {
    SessionPlan {
        writes: (!args.skip_writes).then(|| WritePlan {
            single: SingleInsertParams {
                count: args.single_inserts,
                commit_every: args.commit_every,
            },
            batch: BatchInsertParams {
                batches: args.batch_count,
                batch_size: args.batch_size,
            },
            concurrent: ConcurrentWriteParams {
                workers: args.threads,
                writes_per_worker: args.writes_per_thread,
                commit_every: args.concurrent_commit_every,
            },
            updates: UpdateParams {
                count: args.single_inserts,
            },
        }),
        reads: (!args.skip_reads).then(|| ReadPlan {
            point: PointReadParams {
                count: args.read_queries,
            },
            range: RangeReadParams {
                queries: args.range_queries,
                range_size: args.range_size,
            },
        }),
    }
}

fn print_plan(args: &Args) {
    println!("\nTest Configuration:");
    if !args.skip_writes {
        println!(
            "  - Single Inserts: {} (commit every {})",
            args.single_inserts, args.commit_every
        );
        println!("  - Batch Inserts: {} x {}", args.batch_count, args.batch_size);
        println!(
            "  - Concurrent: {} threads x {} writes (commit every {})",
            args.threads, args.writes_per_thread, args.concurrent_commit_every
        );
        println!("  - Updates: {}", args.single_inserts);
    }
    if !args.skip_reads {
        println!("  - Point Reads: {}", args.read_queries);
        println!(
            "  - Range Reads: {} x {} rows",
            args.range_queries, args.range_size
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let host = args
        .host
        .clone()
        .context("--host is required (or set MYSQL_HOST)")?;
    let user = args
        .user
        .clone()
        .context("--user is required (or set MYSQL_USER)")?;
    let password = args
        .password
        .clone()
        .or_else(|| std::env::var("MYSQL_PASSWORD").ok())
        .context("--pass is required (or set MYSQL_PASS / MYSQL_PASSWORD)")?;

    let rule = "=".repeat(60);
    println!("{rule}");
    println!("MySQL Performance Testing Suite");
    println!("{rule}");
    println!("Label: {}", args.label);
    println!("Host: {host}");
    println!("Database: {}", args.database);
    println!("Connection Pool Size: {}", args.pool_size);
    println!("{rule}");

    let config = TargetConfig {
        host: host.clone(),
        port: args.port,
        user,
        password,
        database: args.database.clone(),
        pool_size: args.pool_size,
        connect_timeout: Duration::from_secs(args.connect_timeout),
        ssl_ca: args.ssl_ca.clone(),
    };

    let target = MysqlTarget::connect(&config).context("failed to initialize connection pool")?;

    let info = target.server_info().context("connection test failed")?;
    println!("\nConnection successful");
    println!("  MySQL Version: {}", info.version);
    println!("  Database: {}", info.database.as_deref().unwrap_or("(none)"));
    println!("  User: {}", info.user);
    if let Some(cipher) = &info.ssl_cipher {
        println!("  SSL Cipher: {cipher}");
    }

    if args.test_connection_only {
        println!("\nConnection test successful, exiting (--test-connection-only)");
        return Ok(());
    }

    target
        .check_permissions()
        .context("permission validation failed")?;
    println!("\nPermissions OK (CREATE/DROP/INSERT)");

    let plan = build_plan(&args);
    print_plan(&args);

    if !args.yes {
        print!("\nPress Enter to start testing (or Ctrl+C to cancel)...");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
    }

    target
        .create_test_table()
        .context("failed to create test table")?;

    let session = BenchmarkSession::new(
        &target,
        args.label.clone(),
        host.clone(),
        args.database.clone(),
    );

    let (set, failed) = match session.run(&plan) {
        Ok(set) => (set, false),
        Err(err) => {
            eprintln!("\nTesting failed during {}: {}", err.kind, err.source);
            (err.partial, true)
        }
    };

    if !set.results.is_empty() {
        let path = recorder::save_result_set(&set, args.output.as_deref())
            .context("failed to save results")?;
        println!("\nResults saved to: {}", path.display());
        println!("\n{}", report::render_run_summary(&set));
    }

    if args.no_cleanup {
        println!("\nTest table preserved (--no-cleanup)");
    } else if let Err(err) = target.drop_test_table() {
        eprintln!("Cleanup failed: {err}");
    } else {
        println!("\nTest table dropped");
    }

    println!("\n{rule}");
    println!("Testing complete");
    println!("{rule}");

    if failed {
        bail!("one or more workloads failed");
    }
    Ok(())
}
