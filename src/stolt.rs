// gpr-migration - Kirchhoff, Stolt and phase-shift migration kernels for ground-penetrating radar

//! Stolt (f-k) migration (C5): constant-velocity migration via a mapping in the 2-D
//! frequency-wavenumber domain. Much cheaper than Kirchhoff and phase-shift since it requires
//! only two 2-D FFTs and a single resampling pass, at the cost of assuming a single constant
//! velocity for the whole section.

use std::f64::consts::PI;

use ndarray::Array2;
use num_complex::Complex64;
use rayon::prelude::*;

use crate::error::MigrationError;
use crate::fft;
use crate::radargram::Radargram;

/// Migrate `rg` by constant-velocity f-k (Stolt) migration.
///
/// `velocity` is the migration velocity in m/s (default for glacial ice is `1.68e8`, see the
/// crate's top-level defaults).
pub fn migrate_stolt(rg: Radargram, velocity: f64) -> Result<Radargram, MigrationError> {
    rg.validate()?;

    let s = rg.snum();
    let t = rg.tnum();
    let dt = rg.dt;
    let dx = rg.dx();
    let nt = fft::next_pow2(s);
    let nx = fft::next_pow2(t);

    log::debug!("stolt migration: {s}x{t} samples padded to {nt}x{nx}, v={velocity:e}");

    let fk = fft::fft2(&rg.samples, (nt, nx));

    let kx: Vec<f64> = fft::fftfreq(nx, dx).into_iter().map(|f| 2.0 * PI * f).collect();
    let ws: Vec<f64> = fft::fftfreq(nt, dt).into_iter().map(|f| 2.0 * PI * f).collect();
    let w_axis = unwrap_fftfreq_axis(&ws);

    // The Stolt mapping only ever resamples along the frequency axis for a fixed kx column (kx
    // stays on its own FFT grid point, only w is stretched) - so the outer loop is over kx
    // columns, each independent of the others, and is parallelized with rayon.
    let columns: Vec<(usize, Vec<Complex64>)> = (0..nx)
        .into_par_iter()
        .map(|ixk| {
            let kxv = kx[ixk];
            let mut col = vec![Complex64::new(0.0, 0.0); nt];
            for (iw, &wv) in ws.iter().enumerate() {
                let kz = 2.0 * wv / velocity;
                let denom = (kz * kz + kxv * kxv).sqrt();
                if denom == 0.0 {
                    continue;
                }
                // w' = (v/2) * sqrt(kz^2 + kx^2) is always non-negative, regardless of the sign
                // of kz (i.e. of wv) - matches the source's literal `wsj` formula verbatim.
                let w_target = 0.5 * velocity * denom;
                let sample = interpolate_column(&fk, ixk, &ws, &w_axis, w_target);
                let obliquity = kz / denom;
                col[iw] = sample * obliquity;
            }
            (ixk, col)
        })
        .collect();

    let mut kk = Array2::<Complex64>::zeros((nt, nx));
    for (ixk, col) in columns {
        for (iw, v) in col.into_iter().enumerate() {
            kk[(iw, ixk)] = v;
        }
    }
    kk[(0, 0)] = Complex64::new(0.0, 0.0);

    fft::ifft2_inplace(&mut kk);
    let norm = (nt * nx) as f64;
    let mut samples = Array2::<f64>::zeros((s, t));
    for i in 0..s {
        for j in 0..t {
            samples[(i, j)] = kk[(i, j)].re / norm;
        }
    }

    Ok(Radargram {
        samples,
        dt,
        travel_time: rg.travel_time,
        trace_interval: rg.trace_interval,
        distance: rg.distance,
    })
}

/// Unwrap an `fftfreq`-ordered axis (DC, positive, negative) into a monotonically increasing
/// sequence, so a target frequency can be located with a binary search instead of stitching
/// across the wrap point between the Nyquist bin and the first negative bin.
fn unwrap_fftfreq_axis(ws: &[f64]) -> Vec<f64> {
    let n = ws.len();
    if n == 0 {
        return Vec::new();
    }
    let dw = if n > 1 { (ws[1] - ws[0]).abs() } else { 1.0 };
    let span = n as f64 * dw;
    let split = (n - 1) / 2 + 1;
    (0..n)
        .map(|i| if i < split { ws[i] } else { ws[i] + span })
        .collect()
}

/// Bilinearly interpolate (in 1-D, along the frequency axis, for the fixed `kx` column `ixk`)
/// `fk`'s real and imaginary parts independently at the target angular frequency `w_target`.
fn interpolate_column(
    fk: &Array2<Complex64>,
    ixk: usize,
    ws: &[f64],
    w_axis: &[f64],
    w_target: f64,
) -> Complex64 {
    let n = ws.len();
    let dw = if n > 1 { (ws[1] - ws[0]).abs() } else { 1.0 };
    let span = n as f64 * dw;
    let target_unwrapped = if w_target >= 0.0 {
        w_target
    } else {
        w_target + span
    };

    let pos = match w_axis.binary_search_by(|probe| probe.partial_cmp(&target_unwrapped).unwrap()) {
        Ok(i) => i as f64,
        Err(0) => return Complex64::new(0.0, 0.0),
        Err(i) if i >= n => return Complex64::new(0.0, 0.0),
        Err(i) => {
            let lo = w_axis[i - 1];
            let hi = w_axis[i];
            (i - 1) as f64 + (target_unwrapped - lo) / (hi - lo)
        }
    };

    let lo = pos.floor().clamp(0.0, (n - 1) as f64) as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = (pos - lo as f64).clamp(0.0, 1.0);

    let a = fk[(lo, ixk)];
    let b = fk[(hi, ixk)];
    a + (b - a) * frac
}
