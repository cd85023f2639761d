//! # Allocator Throughput Benchmark
//!
//! Measures allocate/free churn and reallocate cycles for both arena
//! variants across representative span sizes.
//!
//! Run with: `cargo bench --package quarry_alloc`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quarry_alloc::{BufferAllocator, RangeAllocator};

/// Arena capacity for every benchmark.
const ARENA_SIZE: usize = 64 * 1024 * 1024;

/// Benchmark: allocate/free churn on the range variant.
fn bench_range_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_churn");

    for size in [64usize, 1024, 16 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut arena = RangeAllocator::with_expected_size(ARENA_SIZE, size).unwrap();
            b.iter(|| {
                let first = arena.allocate(black_box(size));
                let second = arena.allocate(size);
                arena.free(first.offset);
                let third = arena.allocate(size * 2);
                arena.free(second.offset);
                arena.free(third.offset);
                black_box(third)
            });
        });
    }

    group.finish();
}

/// Benchmark: allocate/free churn on the buffer variant.
fn bench_buffer_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_churn");

    for size in [64usize, 1024, 16 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut arena = BufferAllocator::new(ARENA_SIZE).unwrap();
            b.iter(|| {
                let first = arena.allocate(black_box(size));
                let second = arena.allocate(size);
                arena.free(first.offset);
                let third = arena.allocate(size * 2);
                arena.free(second.offset);
                arena.free(third.offset);
                black_box(third)
            });
        });
    }

    group.finish();
}

/// Benchmark: grow-then-shrink reallocate cycle on the range variant.
fn bench_range_reallocate_cycle(c: &mut Criterion) {
    c.bench_function("range_reallocate_cycle", |b| {
        let mut arena = RangeAllocator::new(ARENA_SIZE).unwrap();
        let span = arena.allocate(4096);
        let mut offset = span.offset;
        b.iter(|| {
            let (grown, _) = arena.reallocate(offset, 64 * 1024);
            let (shrunk, _) = arena.reallocate(grown.offset, 4096);
            offset = shrunk.offset;
            black_box(shrunk)
        });
    });
}

/// Benchmark: grow-then-shrink reallocate cycle on the buffer variant,
/// including its payload copies.
fn bench_buffer_reallocate_cycle(c: &mut Criterion) {
    c.bench_function("buffer_reallocate_cycle", |b| {
        let mut arena = BufferAllocator::new(ARENA_SIZE).unwrap();
        let span = arena.allocate(4096);
        let mut offset = span.offset;
        b.iter(|| {
            let (grown, _) = arena.reallocate(offset, 64 * 1024);
            let (shrunk, _) = arena.reallocate(grown.offset, 4096);
            offset = shrunk.offset;
            black_box(shrunk)
        });
    });
}

criterion_group!(
    benches,
    bench_range_churn,
    bench_buffer_churn,
    bench_range_reallocate_cycle,
    bench_buffer_reallocate_cycle
);
criterion_main!(benches);
