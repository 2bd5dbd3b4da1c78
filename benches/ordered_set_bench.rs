//! Benchmark for OrderedSet vs standard HashSet.
//!
//! Compares insertion, membership, and set algebra against `HashSet`, which
//! has the same membership complexity but no ordering guarantee.

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use ordset::OrderedSet;
use std::collections::HashSet;
use std::hint::black_box;

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [8, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("OrderedSet", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut set = OrderedSet::new();
                    for index in 0..size {
                        set.insert(black_box(index));
                    }
                    black_box(set)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("HashSet", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut set = HashSet::new();
                    for index in 0..size {
                        set.insert(black_box(index));
                    }
                    black_box(set)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// contains Benchmark
// =============================================================================

fn benchmark_contains(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("contains");

    for size in [8, 1_000, 10_000] {
        let ordered: OrderedSet<i32> = (0..size).collect();
        let hashed: HashSet<i32> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("OrderedSet", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for index in 0..size {
                        black_box(ordered.contains(black_box(&index)));
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("HashSet", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for index in 0..size {
                        black_box(hashed.contains(black_box(&index)));
                    }
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Set algebra Benchmark
// =============================================================================

fn benchmark_union(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("union");

    for size in [1_000, 10_000] {
        let left: OrderedSet<i32> = (0..size).collect();
        let right: OrderedSet<i32> = (size / 2..size + size / 2).collect();

        group.bench_with_input(
            BenchmarkId::new("OrderedSet", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(left.union(&right)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// remove Benchmark (tombstone compaction path)
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in [1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("OrderedSet", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || (0..size).collect::<OrderedSet<i32>>(),
                    |mut set| {
                        for index in 0..size {
                            set.remove(black_box(&index));
                        }
                        black_box(set)
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_contains,
    benchmark_union,
    benchmark_remove
);
criterion_main!(benches);
