use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sundry_window::{MovingAverage, RollingWindow};

/// Benchmark a single push (hot path)
fn bench_push(c: &mut Criterion) {
    let ma: MovingAverage = MovingAverage::new(u64::MAX);

    c.bench_function("push", |b| {
        b.iter(|| {
            ma.push();
        });
    });
}

/// Benchmark push_many with varying counts
fn bench_push_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_many");

    for count in [1u64, 10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let ma: MovingAverage = MovingAverage::new(u64::MAX);
            b.iter(|| {
                ma.push_many(black_box(count));
            });
        });
    }
    group.finish();
}

/// Benchmark reading the rate with a populated window
fn bench_current_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("current_rate");

    for samples in [100u64, 10_000, 100_000].iter() {
        let ma: MovingAverage = MovingAverage::new(u64::MAX);
        ma.push_many(*samples);

        group.bench_with_input(BenchmarkId::from_parameter(samples), samples, |b, _| {
            b.iter(|| black_box(ma.current_rate()));
        });
    }
    group.finish();
}

/// Benchmark building the full status line
fn bench_status(c: &mut Criterion) {
    let ma: MovingAverage = MovingAverage::new(1_000_000);
    ma.push_many(10_000);

    c.bench_function("status_to_string", |b| {
        b.iter(|| black_box(ma.status().to_string()));
    });
}

/// Benchmark contended pushes from several threads
fn bench_concurrent_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_push");

    for threads in [2usize, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            threads,
            |b, &threads| {
                let ma: Arc<MovingAverage> = Arc::new(MovingAverage::new(u64::MAX));
                b.iter(|| {
                    let handles: Vec<_> = (0..threads)
                        .map(|_| {
                            let ma = Arc::clone(&ma);
                            thread::spawn(move || {
                                for _ in 0..100 {
                                    ma.push();
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        let _ = handle.join();
                    }
                });
            },
        );
    }
    group.finish();
}

/// Benchmark rolling window push and average
fn bench_rolling_window(c: &mut Criterion) {
    let mut window = RollingWindow::new(64);

    c.bench_function("rolling_push_average", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            window.push(black_box(i));
            black_box(window.average())
        });
    });
}

criterion_group!(
    benches,
    bench_push,
    bench_push_many,
    bench_current_rate,
    bench_status,
    bench_concurrent_push,
    bench_rolling_window,
);
criterion_main!(benches);
