//! Microbenchmark for the latency statistics kernel.
//!
//! Run: `cargo bench --bench stats`

use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use mysql_perf::stats::LatencySample;

fn summarize_bench(c: &mut Criterion) {
    for &size in &[50usize, 1_000, 100_000] {
        let mut sample = LatencySample::with_capacity(size);
        for i in 0..size {
            sample.record(Duration::from_micros((i % 977) as u64 + 1));
        }

        c.bench_function(&format!("summarize/{size}"), |b| {
            b.iter(|| black_box(&sample).summarize().unwrap())
        });
    }
}

criterion_group!(benches, summarize_bench);
criterion_main!(benches);
