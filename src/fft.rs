// gpr-migration - Kirchhoff, Stolt and phase-shift migration kernels for ground-penetrating radar

//! Shared 1-D/2-D FFT helpers used by the Stolt and phase-shift engines.
//!
//! The narrower spec treats FFT as a black box ("use whatever well-tested FFT primitive the
//! target ecosystem provides"); this module is that primitive, built on `rustfft` the same way
//! the teacher's `helpers.rs` builds its 2-D convolution on `Fft::process_with_scratch`, but
//! generalized from square `n x n` matrices to the rectangular `(rows, cols)` shapes Stolt and
//! phase-shift actually need.

use ndarray::Array2;
use num_complex::Complex64;
use rustfft::{FftDirection, FftPlanner};

/// Smallest power of two `>= n`.
pub fn next_pow2(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    let mut p = 1usize;
    while p < n {
        p <<= 1;
    }
    p
}

/// Discrete FFT sample frequencies, in cycles per unit of `d`, DC-first/positive/negative order
/// (the same convention as `numpy.fft.fftfreq`).
pub fn fftfreq(n: usize, d: f64) -> Vec<f64> {
    let mut out = vec![0.0; n];
    let val = 1.0 / (n as f64 * d);
    let split = (n - 1) / 2 + 1;
    for i in 0..split {
        out[i] = i as f64 * val;
    }
    for i in split..n {
        out[i] = -(((n - i) as f64) * val);
    }
    out
}

/// Forward complex FFT of a single row, in place.
pub fn fft1d(row: &mut [Complex64]) {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft(row.len(), FftDirection::Forward);
    fft.process(row);
}

/// Inverse complex FFT of a single row, in place. Unnormalized (matches `rustfft`'s convention;
/// callers divide by `len()` themselves at the point the algorithm calls for it).
pub fn ifft1d(row: &mut [Complex64]) {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft(row.len(), FftDirection::Inverse);
    fft.process(row);
}

/// Zero-pad `data` to `shape = (rows, cols)` and take the 2-D forward FFT (row FFT, then column
/// FFT), returning the complex result.
pub fn fft2(data: &Array2<f64>, shape: (usize, usize)) -> Array2<Complex64> {
    let (rows, cols) = shape;
    let mut out = Array2::<Complex64>::zeros((rows, cols));
    for ((r, c), &v) in data.indexed_iter() {
        if r < rows && c < cols {
            out[(r, c)] = Complex64::new(v, 0.0);
        }
    }
    fft2_inplace_forward(&mut out);
    out
}

/// In-place forward 2-D FFT (row FFT, then column FFT).
pub fn fft2_inplace_forward(data: &mut Array2<Complex64>) {
    let (rows, cols) = data.dim();
    let mut planner = FftPlanner::new();
    let row_fft = planner.plan_fft(cols, FftDirection::Forward);
    for mut row in data.rows_mut() {
        let slice = row.as_slice_mut().expect("row must be contiguous");
        row_fft.process(slice);
    }
    let col_fft = planner.plan_fft(rows, FftDirection::Forward);
    apply_along_columns(data, &*col_fft);
}

/// In-place inverse 2-D FFT (row IFFT, then column IFFT). Unnormalized.
pub fn ifft2_inplace(data: &mut Array2<Complex64>) {
    let (rows, cols) = data.dim();
    let mut planner = FftPlanner::new();
    let row_fft = planner.plan_fft(cols, FftDirection::Inverse);
    for mut row in data.rows_mut() {
        let slice = row.as_slice_mut().expect("row must be contiguous");
        row_fft.process(slice);
    }
    let col_fft = planner.plan_fft(rows, FftDirection::Inverse);
    apply_along_columns(data, &*col_fft);
}

/// Apply an already-planned FFT to every column of `data` (columns are not contiguous in a
/// row-major `Array2`, so each one is copied into a scratch buffer, transformed, and copied
/// back — the rectangular analogue of the teacher's square-matrix `transpose_2d` trick).
fn apply_along_columns(data: &mut Array2<Complex64>, fft: &dyn rustfft::Fft<f64>) {
    let (rows, cols) = data.dim();
    let mut buf = vec![Complex64::new(0.0, 0.0); rows];
    for c in 0..cols {
        for r in 0..rows {
            buf[r] = data[(r, c)];
        }
        fft.process(&mut buf);
        for r in 0..rows {
            data[(r, c)] = buf[r];
        }
    }
}
