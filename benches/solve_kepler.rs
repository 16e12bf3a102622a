use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sky_orbits::config::SystemConfig;
use sky_orbits::kepler::KeplerSolver;

/// Mean anomalies spread over several turns, [−4π, 4π)
#[inline]
fn rand_mean_anomaly(rng: &mut StdRng) -> f64 {
    (rng.random::<f64>() - 0.5) * 4.0 * std::f64::consts::TAU
}

fn random_cases(rng: &mut StdRng, samples: usize) -> Vec<f64> {
    (0..samples).map(|_| rand_mean_anomaly(rng)).collect()
}

/// One eccentricity per batch, `samples` mean anomalies solved at once.
fn bench_regime(c: &mut Criterion, name: &str, seed: u64, e_range: std::ops::Range<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let solver = KeplerSolver::default();
    let samples = 10_000usize;

    c.bench_function(name, |b| {
        b.iter_batched(
            || {
                let e = rng.random_range(e_range.clone());
                (e, random_cases(&mut rng, samples))
            },
            |(e, ms)| {
                let ecc = solver.solve(black_box(&ms), black_box(e)).unwrap();
                black_box(ecc);
            },
            BatchSize::LargeInput,
        )
    });
}

/// Typical regime: e ∈ [0.0, 0.7)
fn bench_typical(c: &mut Criterion) {
    bench_regime(c, "solve_kepler/typical_e<0.7", 0xDEADBEEF, 0.0..0.7);
}

/// High-eccentricity (still elliptic): e ∈ [0.7, 0.99)
fn bench_high_e(c: &mut Criterion) {
    bench_regime(c, "solve_kepler/high_e_0.7..0.99", 0xBADF00D, 0.7..0.99);
}

/// Near-circular regime: e ≈ 1e-12
fn bench_near_circular(c: &mut Criterion) {
    bench_regime(
        c,
        "solve_kepler/near_circular_e=1e-12",
        0xFEEDFACE,
        1e-12..2e-12,
    );
}

/// Near-parabolic case around periastron, where Newton needs the most iterations.
fn bench_near_parabolic(c: &mut Criterion) {
    let solver = KeplerSolver::default();
    let ms: Vec<f64> = (0..1_000).map(|k| -0.05 + 1e-4 * k as f64).collect();

    c.bench_function("solve_kepler/near_parabolic_e=0.999", |b| {
        b.iter(|| black_box(solver.solve(black_box(&ms), black_box(0.999)).ok()))
    });
}

/// Full two-body run: 100 years sampled every 10 days, without the stop rule.
fn bench_two_body_propagation(c: &mut Criterion) {
    let mut config = SystemConfig::two_body_default();
    config.stop = None;
    let system = config.build_system().unwrap();
    let times = config.time_grid().unwrap();

    c.bench_function("orbit_system/two_body_100y", |b| {
        b.iter(|| black_box(system.propagate(black_box(&times)).unwrap()))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_typical, bench_high_e, bench_near_circular, bench_near_parabolic,
        bench_two_body_propagation
);
criterion_main!(benches);
