// gpr-migration - Kirchhoff, Stolt and phase-shift migration kernels for ground-penetrating radar

//! Banded second-difference operator used by the Fourier finite-difference diffraction term.
//!
//! The narrower spec's source builds a generic sparse matrix and only ever multiplies it by
//! vectors, so this crate skips the sparse-matrix dependency entirely and applies the band
//! directly: `y[i] = d*v[i] + k1*v[i+1] + k2*v[i-1]` (+ the optional `+-nx` terms), with two
//! boundary rows overridden as described below.

/// A banded `N x N` operator with up to two pairs of off-diagonals.
///
/// Boundary rows are **not** plain Dirichlet identity rows: the first row is `[1, 0, ..., 0]`
/// (a genuine Dirichlet row), but the last row is set to *all ones* — this is what the source
/// material actually does, and is preserved here rather than "corrected". It may be an
/// intentional absorbing boundary, or it may be a bug inherited from the original SeisUnix-derived
/// script; either way, changing it would silently change migration output for every v(x,z) run,
/// so it stays exactly as specified.
#[derive(Clone, Debug)]
pub struct BandStencil {
    n: usize,
    d: f64,
    k1: f64,
    k2: f64,
    k3: f64,
    k4: f64,
    nx: usize,
}

impl BandStencil {
    /// Build the discrete Laplacian stencil used by the Fourier finite-difference term:
    /// `d = -2`, `k1 = k2 = 1`, no second off-diagonal.
    pub fn laplacian(n: usize) -> Self {
        Self::new(n, -2.0, 1.0, 1.0, 0.0, 0.0, 0)
    }

    /// Build a general banded operator. `k3`/`k4` sit at offsets `+nx`/`-nx` from the diagonal
    /// (set `nx = 0` to disable them, as the Laplacian stencil does).
    pub fn new(n: usize, d: f64, k1: f64, k2: f64, k3: f64, k4: f64, nx: usize) -> Self {
        BandStencil {
            n,
            d,
            k1,
            k2,
            k3,
            k4,
            nx,
        }
    }

    /// Operator dimension `N`.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Apply the operator: `y = A . v`.
    pub fn apply(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.n, "stencil/vector length mismatch");
        let n = self.n;
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut acc = self.d * v[i];
            if i + 1 < n {
                acc += self.k1 * v[i + 1];
            }
            if i > 0 {
                acc += self.k2 * v[i - 1];
            }
            if self.nx > 0 {
                if i + self.nx < n {
                    acc += self.k3 * v[i + self.nx];
                }
                if i >= self.nx {
                    acc += self.k4 * v[i - self.nx];
                }
            }
            y[i] = acc;
        }
        // Dirichlet-like boundary rows, preserved verbatim from the source.
        if n > 0 {
            y[0] = v[0];
        }
        if n > 0 {
            y[n - 1] = v.iter().sum();
        }
        y
    }

    /// Apply the operator to a complex vector, real and imaginary parts independently (used by
    /// the Fourier finite-difference term, which runs this stencil on frequency-space data).
    pub fn apply_complex(&self, v: &[num_complex::Complex64]) -> Vec<num_complex::Complex64> {
        let re: Vec<f64> = v.iter().map(|c| c.re).collect();
        let im: Vec<f64> = v.iter().map(|c| c.im).collect();
        let re_out = self.apply(&re);
        let im_out = self.apply(&im);
        re_out
            .into_iter()
            .zip(im_out)
            .map(|(r, i)| num_complex::Complex64::new(r, i))
            .collect()
    }
}
