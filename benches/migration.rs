/// Wall-clock comparison of Kirchhoff vs. Stolt migration at a realistic section size.
/// Stolt is expected to be roughly an order of magnitude faster: it pays for two 2-D FFTs and a
/// single resampling pass, where Kirchhoff's diffraction sum revisits every trace for every
/// output pixel.

use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array2;

use gpr_migration::{migrate_kirchhoff, migrate_stolt, Radargram};

const SNUM: usize = 512;
const TNUM: usize = 512;

fn hyperbola_radargram() -> Radargram {
    let dt = 10e-9;
    let dx = 1.0;
    let velocity = 1.68e8;
    let t0 = 2e-6;
    let x0 = (TNUM as f64 / 2.0) * dx;

    let travel_time: Vec<f64> = (1..=SNUM).map(|i| i as f64 * dt * 1e6).collect();
    let distance: Vec<f64> = (0..TNUM).map(|i| i as f64 * dx).collect();
    let mut samples = Array2::zeros((SNUM, TNUM));
    for (j, &x) in distance.iter().enumerate() {
        let t = (t0 * t0 + (2.0 * (x - x0) / velocity).powi(2)).sqrt();
        let i = (t / dt).round() as usize;
        if i < SNUM {
            samples[(i, j)] = 1.0;
        }
    }

    Radargram {
        samples,
        dt,
        travel_time,
        trace_interval: vec![dx; TNUM],
        distance,
    }
}

fn kirchhoff_benchmark(c: &mut Criterion) {
    c.bench_function("migrate_kirchhoff_512x512", |b| {
        b.iter(|| migrate_kirchhoff(hyperbola_radargram(), 1.68e8, false).unwrap())
    });
}

fn stolt_benchmark(c: &mut Criterion) {
    c.bench_function("migrate_stolt_512x512", |b| {
        b.iter(|| migrate_stolt(hyperbola_radargram(), 1.68e8).unwrap())
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = kirchhoff_benchmark, stolt_benchmark
}
criterion_main!(benches);
