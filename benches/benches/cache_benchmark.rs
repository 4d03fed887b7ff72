//! Gap computation and warm-cache query benchmarks.
//!
//! Run with: `cargo bench --package barcache-bench`

use barcache_bench::{SyntheticOrigin, bench_bar_set, fragmented_coverage};
use barcache_lib::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

fn gap_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_gaps");

    for count in [10usize, 1_000, 100_000] {
        let coverage = fragmented_coverage(count, 60, 120);
        let requested = TimeRange::new(0, count as i64 * 120).unwrap();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &coverage, |b, coverage| {
            b.iter(|| compute_gaps(black_box(requested), black_box(coverage)).unwrap());
        });
    }

    group.finish();
}

fn warm_cache_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let bar_set = bench_bar_set();
    let mut group = c.benchmark_group("get_bars_warm");

    for days in [1i64, 30] {
        let requested = TimeRange::new(0, days * 86_400).unwrap();
        let cache = BarCache::new(
            Arc::new(MemoryBarStore::new()),
            Arc::new(SyntheticOrigin { step: 60 }),
            Arc::new(ClosedSessionOracle),
        );
        // Fill once so the measured calls never reach the origin
        runtime.block_on(cache.get_bars(&bar_set, requested)).unwrap();

        group.throughput(Throughput::Elements((days * 1_440) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &requested, |b, requested| {
            b.to_async(&runtime).iter(|| async {
                let response = cache.get_bars(&bar_set, *requested).await.unwrap();
                assert_eq!(response.report.fetch_count(), 0);
                black_box(response.bars.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, gap_benchmark, warm_cache_benchmark);
criterion_main!(benches);
