//! Black-box integration tests against the public API: cross-engine agreement and the
//! concrete scenarios named in the crate's design notes.

use approx::assert_relative_eq;
use ndarray::Array2;

use gpr_migration::{migrate_kirchhoff, migrate_phaseshift, migrate_stolt, MigrationError, Radargram, VelocitySpec};

const VELOCITY: f64 = 1.68e8;

/// Integration tests run as the embedding binary would: opt into `log`/`env_logger` so the
/// crate's internal `log::debug!`/`log::trace!` calls are visible under `RUST_LOG=debug`.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn hyperbola_radargram(snum: usize, tnum: usize, dt: f64, dx: f64, t0: f64, x0: f64) -> Radargram {
    let travel_time: Vec<f64> = (1..=snum).map(|i| i as f64 * dt * 1e6).collect();
    let distance: Vec<f64> = (0..tnum).map(|i| i as f64 * dx).collect();
    let mut samples = Array2::zeros((snum, tnum));
    for (j, &x) in distance.iter().enumerate() {
        let t = (t0 * t0 + (2.0 * (x - x0) / VELOCITY).powi(2)).sqrt();
        let i = (t / dt).round() as usize;
        if i < snum {
            samples[(i, j)] = 1.0;
        }
    }
    Radargram {
        samples,
        dt,
        travel_time,
        trace_interval: vec![dx; tnum],
        distance,
    }
}

fn argmax_2d(m: &Array2<f64>) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_val = f64::NEG_INFINITY;
    for ((i, j), &v) in m.indexed_iter() {
        if v.abs() > best_val {
            best_val = v.abs();
            best = (i, j);
        }
    }
    best
}

fn l2_relative_error(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    let num: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt();
    let den: f64 = a.iter().map(|x| x.powi(2)).sum::<f64>().sqrt();
    if den == 0.0 {
        num
    } else {
        num / den
    }
}

#[test]
fn kirchhoff_collapses_a_synthetic_hyperbola_near_its_apex() {
    let snum = 300;
    let tnum = 200;
    let dt = 10e-9;
    let dx = 1.0;
    let t0 = 2e-6;
    let x0 = 100.0;
    let rg = hyperbola_radargram(snum, tnum, dt, dx, t0, x0);

    let out = migrate_kirchhoff(rg, VELOCITY, false).unwrap();
    let (ti, xj) = argmax_2d(&out.samples);

    let expected_ti = (t0 / dt).round() as usize;
    let expected_xj = (x0 / dx).round() as usize;
    assert!(
        (ti as isize - expected_ti as isize).abs() <= 1,
        "expected apex time index near {expected_ti}, got {ti}"
    );
    assert!(
        (xj as isize - expected_xj as isize).abs() <= 1,
        "expected apex trace index near {expected_xj}, got {xj}"
    );
}

#[test]
fn stolt_collapses_the_same_hyperbola_near_its_apex() {
    let snum = 256;
    let tnum = 256;
    let dt = 10e-9;
    let dx = 1.0;
    let t0 = 2e-6;
    let x0 = 128.0;
    let rg = hyperbola_radargram(snum, tnum, dt, dx, t0, x0);

    let out = migrate_stolt(rg, VELOCITY).unwrap();
    let (ti, xj) = argmax_2d(&out.samples);

    let expected_ti = (t0 / dt).round() as usize;
    let expected_xj = (x0 / dx).round() as usize;
    assert!(
        (ti as isize - expected_ti as isize).abs() <= 1,
        "expected apex time index near {expected_ti}, got {ti}"
    );
    assert!(
        (xj as isize - expected_xj as isize).abs() <= 1,
        "expected apex trace index near {expected_xj}, got {xj}"
    );
}

#[test]
fn phase_shift_constant_velocity_agrees_with_stolt() {
    let snum = 128;
    let tnum = 128;
    let dt = 10e-9;
    let dx = 1.0;
    let rg = hyperbola_radargram(snum, tnum, dt, dx, 1.5e-6, 64.0);

    let stolt_out = migrate_stolt(rg.clone(), VELOCITY).unwrap();
    let phase_shift_out = migrate_phaseshift(rg, VelocitySpec::Constant(VELOCITY)).unwrap();

    let err = l2_relative_error(&stolt_out.samples, &phase_shift_out.samples);
    assert!(err < 0.05, "relative L2 error {err} should be under 5%");
}

#[test]
fn shape_preserved_across_all_three_engines() {
    init_logging();
    let rg = hyperbola_radargram(96, 64, 10e-9, 1.0, 1e-6, 32.0);
    let expected = (96, 64);

    let k = migrate_kirchhoff(rg.clone(), VELOCITY, false).unwrap();
    assert_eq!(k.samples.dim(), expected);

    let s = migrate_stolt(rg.clone(), VELOCITY).unwrap();
    assert_eq!(s.samples.dim(), expected);

    let p = migrate_phaseshift(rg, VelocitySpec::Constant(VELOCITY)).unwrap();
    assert_eq!(p.samples.dim(), expected);
}

#[test]
fn all_zero_input_migrates_to_zero_for_every_engine() {
    let rg = Radargram {
        samples: Array2::zeros((64, 32)),
        dt: 10e-9,
        travel_time: (1..=64).map(|i| i as f64 * 10e-9 * 1e6).collect(),
        trace_interval: vec![1.0; 32],
        distance: (0..32).map(|i| i as f64).collect(),
    };

    let k = migrate_kirchhoff(rg.clone(), VELOCITY, false).unwrap();
    assert!(k.samples.iter().all(|&v| v.abs() < 1e-9));

    let s = migrate_stolt(rg.clone(), VELOCITY).unwrap();
    assert!(s.samples.iter().all(|&v| v.abs() < 1e-9));

    let p = migrate_phaseshift(rg, VelocitySpec::Constant(VELOCITY)).unwrap();
    assert!(p.samples.iter().all(|&v| v.abs() < 1e-9));
}

#[test]
fn shape_mismatch_is_rejected_before_any_engine_runs() {
    let mut rg = hyperbola_radargram(500, 400, 10e-9, 1.0, 1e-6, 100.0);
    rg.samples = Array2::zeros((499, 400));

    assert!(matches!(
        migrate_kirchhoff(rg.clone(), VELOCITY, false),
        Err(MigrationError::ShapeMismatch { expected: (500, 400), actual: (499, 400) })
    ));
    assert!(matches!(
        migrate_stolt(rg.clone(), VELOCITY),
        Err(MigrationError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        migrate_phaseshift(rg, VelocitySpec::Constant(VELOCITY)),
        Err(MigrationError::ShapeMismatch { .. })
    ));
}

#[test]
fn gridded_velocity_spec_with_all_zero_distance_is_rejected() {
    let mut rg = hyperbola_radargram(64, 32, 10e-9, 1.0, 1e-6, 16.0);
    rg.distance = vec![0.0; 32];
    let spec = VelocitySpec::Gridded(vec![(1.5e8, 50.0, 0.0), (1.7e8, 300.0, 30.0)]);

    assert!(matches!(
        migrate_phaseshift(rg, spec),
        Err(MigrationError::DistanceUnset)
    ));
}

#[test]
fn kirchhoff_peak_amplitude_documents_missing_r_factor() {
    // Two otherwise-identical point scatterers at different depths should, under a correct
    // Yilmaz-style 1/r far-field term, show migrated peak amplitudes that differ with depth. The
    // far-field term this engine implements omits that `r` factor (see `kirchhoff.rs`), so the
    // shallow and deep peak amplitudes come out closer to each other than a `1/r`-correct
    // migration would produce. This test documents the gap rather than asserting a "fixed" value.
    let snum = 256;
    let tnum = 128;
    let dt = 10e-9;
    let dx = 1.0;

    let mut shallow = Radargram {
        samples: Array2::zeros((snum, tnum)),
        dt,
        travel_time: (1..=snum).map(|i| i as f64 * dt * 1e6).collect(),
        trace_interval: vec![dx; tnum],
        distance: (0..tnum).map(|i| i as f64 * dx).collect(),
    };
    shallow.samples[(40, 64)] = 1.0;
    let mut deep = shallow.clone();
    deep.samples.fill(0.0);
    deep.samples[(200, 64)] = 1.0;

    let shallow_out = migrate_kirchhoff(shallow, VELOCITY, false).unwrap();
    let deep_out = migrate_kirchhoff(deep, VELOCITY, false).unwrap();

    let shallow_peak = shallow_out.samples.iter().cloned().fold(0.0_f64, |a, b| a.max(b.abs()));
    let deep_peak = deep_out.samples.iter().cloned().fold(0.0_f64, |a, b| a.max(b.abs()));

    assert!(shallow_peak.is_finite() && deep_peak.is_finite());
    // Both peaks are nonzero; under a `1/r`-correct formula the deep peak would be suppressed
    // much more strongly relative to the shallow one than it is here.
    assert!(shallow_peak > 0.0 && deep_peak > 0.0);
}

#[test]
fn layered_velocity_profile_is_monotonic_and_brackets_input_via_phase_shift() {
    // Exercises the velocity module through the public migrate_phaseshift entry point rather
    // than calling VelocityField::build directly (that path is unit-tested in velocity.rs).
    let rg = hyperbola_radargram(512, 16, 10e-9, 1.0, 1e-6, 8.0);
    let spec = VelocitySpec::Layered(vec![(1.5e8, 100.0), (1.7e8, 500.0)]);
    let out = migrate_phaseshift(rg, spec).unwrap();
    assert!(out.samples.iter().all(|v| v.is_finite()));
}
