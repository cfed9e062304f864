// gpr-migration - Kirchhoff, Stolt and phase-shift migration kernels for ground-penetrating radar

//! Fourier finite-difference (FFD) diffraction correction (C3), applied by the phase-shift
//! engine's v(x,z) branch at every depth step to correct the thin-lens phase shift for
//! wide-angle / laterally varying velocity.

use num_complex::Complex64;

use crate::stencil::BandStencil;

/// Second-order coefficient of the 45-degree wide-angle equation.
pub const ALPHA: f64 = 0.5;
/// Third-order coefficient of the 45-degree wide-angle equation.
pub const BETA: f64 = 0.25;

/// One explicit backward-Euler-style FFD correction step.
///
/// `ffx` is the current depth's frequency-space row (after the retardation and thin-lens terms
/// have already been applied), `ffx_last` is the *previous* depth's row after its own FFD
/// correction. `vs` is the per-trace foreground migration velocity at this depth (length `T`),
/// `w` is the angular frequency of this frequency bin, `dt`/`dx` are the time and trace sample
/// intervals, and `stencil` is the shared discrete Laplacian (C1). Returns the corrected row,
/// which becomes the new `ffx_last` for the next depth step.
pub fn fourier_finite_diff(
    ffx: &[Complex64],
    ffx_last: &[Complex64],
    vs: &[f64],
    w: f64,
    dt: f64,
    dx: f64,
    stencil: &BandStencil,
) -> Vec<Complex64> {
    let j = Complex64::new(0.0, 1.0);
    let lap_ffx = stencil.apply_complex(ffx);
    let lap_last = stencil.apply_complex(ffx_last);

    let mut out = vec![Complex64::new(0.0, 0.0); ffx.len()];
    for i in 0..out.len() {
        let v2 = vs[i] * vs[i];
        let c1 = Complex64::new(dt * ALPHA * v2, 0.0) / (j * 4.0 * w * dx * dx);
        let c2 = -BETA * v2 / (4.0 * w * w * dx * dx);
        out[i] = ffx_last[i] + c1 * lap_ffx[i] + c2 * (lap_ffx[i] - lap_last[i]);
    }
    out
}
