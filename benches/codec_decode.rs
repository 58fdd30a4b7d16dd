//! Benchmarks for line decoding
//!
//! Measures per-line decode cost for well-formed frames and for the noise
//! the read loop has to reject.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use trackline::FrameCodec;
use trackline::test_utils::{noisy_capture, spiral_sample, telemetry_line};

fn bench_decode_valid(c: &mut Criterion) {
    let line = telemetry_line(&spiral_sample(42));

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("valid_frame", |b| {
        b.iter(|| black_box(FrameCodec::decode(black_box(&line))))
    });
    group.bench_function("truncated_frame", |b| {
        b.iter(|| black_box(FrameCodec::decode(black_box("{\"x\":12.5,\"y\":"))))
    });
    group.bench_function("missing_field", |b| {
        b.iter(|| black_box(FrameCodec::decode(black_box("{\"x\":1,\"y\":2}"))))
    });
    group.finish();
}

fn bench_decode_capture(c: &mut Criterion) {
    let capture = noisy_capture(1000, 10);

    let mut group = c.benchmark_group("decode_capture");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("1000_samples_10pct_noise", |b| {
        b.iter(|| {
            let decoded = black_box(&capture).lines().filter_map(FrameCodec::decode).count();
            black_box(decoded)
        })
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let message = serde_json::json!({"text": "set_mode", "mode": 2});
    c.bench_function("encode_message", |b| {
        b.iter(|| black_box(FrameCodec::encode(black_box(&message))))
    });
}

criterion_group!(benches, bench_decode_valid, bench_decode_capture, bench_encode);
criterion_main!(benches);
