//! Criterion micro-benchmarks for tier allocation and per-slot get/set.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use hoard_bench::{tiered_profiles, PROFILE_UNITS};
use hoard_core::IndexedStore;
use hoard_test_utils::Rgba;

/// Rgba elements in a profile-sized request (4 units each).
const ELEMENTS: i64 = (PROFILE_UNITS / 4) as i64;

/// Benchmark: allocate a profile-sized container on each tier.
fn bench_allocate(c: &mut Criterion) {
    for (kind, storage) in tiered_profiles() {
        c.bench_function(&format!("allocate_{kind}"), |b| {
            b.iter(|| {
                let container = storage.allocate(&Rgba::default(), ELEMENTS).unwrap();
                black_box(container.size());
            });
        });
    }
}

/// Benchmark: strided set + get of 1K slots on each tier.
fn bench_get_set(c: &mut Criterion) {
    for (kind, storage) in tiered_profiles() {
        let mut container = storage.allocate(&Rgba::default(), ELEMENTS).unwrap();
        assert_eq!(container.storage_kind(), kind);
        let stride = (ELEMENTS / 1024) as u64;
        let mut out = Rgba::default();
        c.bench_function(&format!("get_set_1k_{kind}"), |b| {
            b.iter(|| {
                for i in 0..1024u64 {
                    let index = i * stride;
                    container
                        .set(index, &Rgba::new(i as u8, 1, 2, 3))
                        .unwrap();
                    container.get(index, &mut out).unwrap();
                }
                black_box(out);
            });
        });
    }
}

/// Benchmark: bulk load a profile-sized byte buffer through the dispatcher.
fn bench_bulk_load(c: &mut Criterion) {
    let raw: Vec<u8> = (0..PROFILE_UNITS).map(|i| i as u8).collect();
    let storage = hoard_bench::array_profile();
    c.bench_function("from_bytes_1m_units", |b| {
        b.iter(|| {
            let container = storage.from_bytes(&Rgba::default(), &raw).unwrap();
            black_box(container.size());
        });
    });
}

criterion_group!(benches, bench_allocate, bench_get_set, bench_bulk_load);
criterion_main!(benches);
