//! Benchmarks for trail maintenance
//!
//! Appending at capacity is the steady state while streaming; frame building
//! runs once per delivered sample.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use trackline::render::Trail;
use trackline::test_utils::spiral_sample;
use trackline::{TrajectoryBuffer, Viewport};

fn bench_append_at_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_at_capacity");

    for capacity in [100usize, 1000, 10_000] {
        let mut buffer = TrajectoryBuffer::new(capacity);
        buffer.extend((0..capacity).map(spiral_sample));
        let sample = spiral_sample(capacity);

        group.bench_with_input(BenchmarkId::from_parameter(capacity), &sample, |b, sample| {
            b.iter(|| buffer.append(black_box(*sample)))
        });
    }

    group.finish();
}

fn bench_frame_build(c: &mut Criterion) {
    let mut trail = Trail::new(Viewport::default(), 1000);
    for i in 0..1000 {
        trail.ingest(spiral_sample(i));
    }

    c.bench_function("frame_build_1000", |b| b.iter(|| black_box(trail.frame())));
}

criterion_group!(benches, bench_append_at_capacity, bench_frame_build);
criterion_main!(benches);
