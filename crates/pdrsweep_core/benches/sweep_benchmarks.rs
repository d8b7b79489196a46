//! Criterion benchmarks for pdrsweep_core aggregation
//!
//! Run with: cargo bench -p pdrsweep_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pdrsweep_core::{
    RateSchedule, RawRunOutput, SweepConfig, SweepSpace, aggregate, extract, reduce,
};

fn create_space(points: usize) -> SweepSpace {
    let config = SweepConfig {
        rates: RateSchedule::LogSpaced {
            start_exponent: -2.0,
            stop_exponent: 1.0,
            count: points,
        },
        ..Default::default()
    };
    config.plan().expect("benchmark config is valid")
}

fn bench_aggregate_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_reduce");

    for (points, runs) in [(14, 10), (50, 30), (200, 100)] {
        let space = create_space(points);
        group.bench_with_input(
            BenchmarkId::new("points_x_runs", format!("{points}x{runs}")),
            &runs,
            |b, &runs| {
                b.iter(|| {
                    let cube = aggregate(black_box(&space), runs, |combo, run| {
                        let sent = 1000.0 + run as f64;
                        let received = (combo.period.seconds() % 1000) as f64;
                        Ok(received / sent)
                    })
                    .expect("aggregate");
                    reduce(&cube).expect("reduce")
                })
            },
        );
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    group.bench_function("parse_and_extract", |b| {
        b.iter(|| {
            let raw = RawRunOutput::parse(black_box("1200.000000 1100.000000 1250 1100 90 10 50 0"))
                .expect("parse");
            extract(&raw, black_box(false), 1200).expect("extract")
        })
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate_reduce, bench_extract);
criterion_main!(benches);
