//! Benchmarks of the per-subhalo profile kernel (sorted view + bin reductions).
//!
//!   cargo bench --bench profile_bins
//!   cargo bench --bench profile_bins -- profile_bins/g_bar
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use mond_profile::{
    particles::{Particle, ParticleTable, ParticleType},
    profile::{
        AccelerationModel, BaryonicAcceleration, ObservedAcceleration, RadialBins, RadialShells,
    },
};

/// Deterministic pseudo-random disc: radii in (0, 50) kpc.
fn make_table(n: usize) -> ParticleTable {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..n)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let u = (state >> 11) as f64 / (1u64 << 53) as f64;
            let kind = if i % 3 == 0 {
                ParticleType::Star
            } else {
                ParticleType::Gas
            };
            Particle::new(50.0 * u + 1e-3, 1e6, 200.0 * u.sqrt(), kind)
        })
        .collect()
}

fn bench_kernel(c: &mut Criterion) {
    let bins = RadialBins::new((1..=40).map(|i| i as f64), 1.0).unwrap();
    let mut group = c.benchmark_group("profile_bins");

    for n in [1_000usize, 10_000, 100_000] {
        let table = make_table(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("shells", n), &table, |b, table| {
            b.iter(|| RadialShells::new(black_box(table)))
        });

        let shells = RadialShells::new(&table);
        group.bench_with_input(BenchmarkId::new("g_obs", n), &shells, |b, shells| {
            b.iter(|| {
                bins.iter()
                    .map(|bin| ObservedAcceleration.bin_value(black_box(shells), bin))
                    .sum::<f64>()
            })
        });

        let model = BaryonicAcceleration::default();
        group.bench_with_input(BenchmarkId::new("g_bar", n), &shells, |b, shells| {
            b.iter(|| {
                bins.iter()
                    .map(|bin| model.bin_value(black_box(shells), bin))
                    .sum::<f64>()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kernel);
criterion_main!(benches);
