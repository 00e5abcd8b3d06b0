//! Criterion benchmarks comparing the multiplication strategies.
//!
//! This is the statistical counterpart to the metrics harness: same
//! strategies, same inputs, but criterion's sampling instead of the
//! single-shot wall/CPU/memory measurement.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use parmul::matrix::generate;
use parmul::strategies::Strategy;
use std::hint::black_box;

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");

    for size in [64, 128] {
        let a = generate::random(size, size);
        let b = generate::random(size, size);

        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), size),
                &size,
                |bencher, _| {
                    bencher.iter(|| {
                        let c = strategy
                            .multiply(black_box(&a), black_box(&b), 4)
                            .expect("square inputs cannot mismatch");
                        black_box(c)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_thread_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("thread_scaling");

    let size = 128;
    let a = generate::random(size, size);
    let b = generate::random(size, size);

    for strategy in [Strategy::ThreadPool, Strategy::RowThreadsChunked] {
        for threads in [1, 2, 4, 8] {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), threads),
                &threads,
                |bencher, &threads| {
                    bencher.iter(|| {
                        let c = strategy
                            .multiply(black_box(&a), black_box(&b), threads)
                            .expect("square inputs cannot mismatch");
                        black_box(c)
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_thread_scaling);
criterion_main!(benches);
