//! Benchmarks for the VRC7 synthesis hot path
//!
//! Run with: cargo bench --bench chip

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use vrc7::Vrc7;

/// Configure all six channels with bank instruments and triggered notes
fn setup_chip() -> Vrc7 {
    let mut chip = Vrc7::new();
    for ch in 0..6u8 {
        chip.write_register(0x30 + ch, 0x10 + ch);
        chip.write_register(0x10 + ch, 0xac);
        chip.write_register(0x20 + ch, 0x14);
    }
    chip
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let mut chip = setup_chip();

    for iterations in [100usize, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            iterations,
            |b, &iterations| {
                b.iter(|| {
                    for _ in 0..iterations {
                        chip.tick();
                    }
                    black_box(&chip);
                });
            },
        );
    }

    group.finish();
}

fn bench_fetch_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("fetch_samples");
    let mut chip = setup_chip();

    for sample_count in [480usize, 4800, 48000].iter() {
        let mut buffer = vec![0i16; *sample_count];
        group.bench_with_input(
            BenchmarkId::from_parameter(sample_count),
            sample_count,
            |b, _| {
                b.iter(|| {
                    chip.fetch_samples_into(&mut buffer);
                    black_box(&buffer);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tick, bench_fetch_samples);
criterion_main!(benches);
