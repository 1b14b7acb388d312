//! Criterion micro-benchmarks for value exchange.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tether_adapter::ModelAdapter;
use tether_bench::{initialized, plate_profile};
use tether_models::TEMPERATURE;

/// Benchmark: snapshot copy of a 10K-node variable.
fn bench_get_value_10k(c: &mut Criterion) {
    let adapter = initialized(plate_profile(42)).unwrap();
    c.bench_function("get_value_10k", |b| {
        b.iter(|| black_box(adapter.get_value(black_box(TEMPERATURE)).unwrap()));
    });
}

/// Benchmark: aliasing handle lookup, no data copied.
fn bench_get_value_ref_10k(c: &mut Criterion) {
    let adapter = initialized(plate_profile(42)).unwrap();
    c.bench_function("get_value_ref_10k", |b| {
        b.iter(|| black_box(adapter.get_value_ref(black_box(TEMPERATURE)).unwrap()));
    });
}

/// Benchmark: in-place overwrite of a 10K-node variable.
fn bench_set_value_10k(c: &mut Criterion) {
    let mut adapter = initialized(plate_profile(42)).unwrap();
    let field = vec![0.5; 10_000];
    c.bench_function("set_value_10k", |b| {
        b.iter(|| adapter.set_value(TEMPERATURE, black_box(&field)).unwrap());
    });
}

/// Benchmark: 1000 scattered indexed reads.
fn bench_get_value_at_indices_1k(c: &mut Criterion) {
    let adapter = initialized(plate_profile(42)).unwrap();
    let indices: Vec<usize> = (0..1000).map(|i| (i * 7919) % 10_000).collect();
    c.bench_function("get_value_at_indices_1k", |b| {
        b.iter(|| black_box(adapter.get_value_at_indices(TEMPERATURE, &indices).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_get_value_10k,
    bench_get_value_ref_10k,
    bench_set_value_10k,
    bench_get_value_at_indices_1k,
);
criterion_main!(benches);
