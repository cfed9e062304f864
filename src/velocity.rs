// gpr-migration - Kirchhoff, Stolt and phase-shift migration kernels for ground-penetrating radar

//! Velocity model construction (C2): map a user-supplied velocity specification onto the
//! radargram's (sample, trace) grid as a migration-velocity field expressed in two-way-time
//! coordinates.
//!
//! Numeric semantics (the extension rule at the shallow/deep ends, the centred-difference
//! derivative, the nearest-neighbour + trapezoid integration for the gridded case) are ported
//! directly from `getVelocityProfile` in the ImpDAR source this crate's spec was distilled from,
//! not reinvented.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::error::MigrationError;
use crate::radargram::Radargram;

/// User-supplied velocity specification.
#[derive(Clone, Debug)]
pub enum VelocitySpec {
    /// Uniform velocity, in m/s.
    Constant(f64),
    /// `v(z)`: rows of `(velocity m/s, depth m)`, at least 2, ordered by increasing depth.
    Layered(Vec<(f64, f64)>),
    /// `v(x,z)`: rows of `(velocity m/s, depth m, lateral position m)`, at least 2.
    Gridded(Vec<(f64, f64, f64)>),
}

/// Migration-velocity field, gridded onto the radargram's sample/trace axes.
#[derive(Clone, Debug)]
pub enum VelocityField {
    Constant(f64),
    /// Length `S`, time-indexed.
    Layered(Vec<f64>),
    /// Shape `(S, T)`.
    Gridded(Array2<f64>),
}

impl VelocityField {
    /// Build the velocity field described by `spec` for the grid geometry of `rg`.
    pub fn build(rg: &Radargram, spec: &VelocitySpec) -> Result<Self, MigrationError> {
        match spec {
            VelocitySpec::Constant(v) => Ok(VelocityField::Constant(*v)),
            VelocitySpec::Layered(rows) => layered_profile(rg, rows).map(VelocityField::Layered),
            VelocitySpec::Gridded(rows) => gridded_profile(rg, rows).map(VelocityField::Gridded),
        }
    }
}

/// Linear interpolation of `ys` at `xs`, evaluated at `query`. Assumes `xs` sorted ascending.
/// Extrapolates linearly using the end segment's slope when `query` falls outside `[xs[0],
/// xs[-1]]` — callers that must reject out-of-range queries check the domain explicitly first
/// (see `OutOfRange`), matching how the source's `interp1d` calls are guarded.
fn linear_interp(xs: &[f64], ys: &[f64], query: f64) -> f64 {
    let n = xs.len();
    if n == 1 {
        return ys[0];
    }
    let idx = match xs.binary_search_by(|probe| probe.partial_cmp(&query).unwrap()) {
        Ok(i) => return ys[i],
        Err(i) => i,
    };
    let (lo, hi) = if idx == 0 {
        (0, 1)
    } else if idx >= n {
        (n - 2, n - 1)
    } else {
        (idx - 1, idx)
    };
    let t = (query - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + t * (ys[hi] - ys[lo])
}

/// `numpy.gradient`-equivalent first derivative: centred (non-uniform-spacing-aware) differences
/// in the interior, one-sided differences at the ends.
pub(crate) fn gradient_nonuniform(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    assert_eq!(n, y.len());
    let mut out = vec![0.0; n];
    if n < 2 {
        return out;
    }
    out[0] = (y[1] - y[0]) / (x[1] - x[0]);
    out[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);
    for i in 1..n - 1 {
        let hs = x[i] - x[i - 1];
        let hd = x[i + 1] - x[i];
        out[i] = (hs * hs * y[i + 1] + (hd * hd - hs * hs) * y[i] - hd * hd * y[i - 1])
            / (hs * hd * (hs + hd));
    }
    out
}

/// Trapezoidal rule integral of `y` over `x`.
fn trapz(y: &[f64], x: &[f64]) -> f64 {
    if y.len() < 2 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..y.len() - 1 {
        acc += (x[i + 1] - x[i]) * (y[i] + y[i + 1]) / 2.0;
    }
    acc
}

fn argmin(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap()
}

fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap()
}

fn layered_profile(rg: &Radargram, rows: &[(f64, f64)]) -> Result<Vec<f64>, MigrationError> {
    if rows.len() < 2 {
        return Err(MigrationError::InvalidVelocitySpec(
            "layered velocity spec needs at least 2 rows".into(),
        ));
    }
    let mut vel_v: Vec<f64> = rows.iter().map(|r| r.0).collect();
    let mut vel_z: Vec<f64> = rows.iter().map(|r| r.1).collect();
    let twtt = rg.twtt_seconds();
    let s = twtt.len();

    let max_v = vel_v.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut zs = vec![0.0; s];
    for i in 1..s {
        zs[i] = max_v * twtt[i] / 2.0;
    }
    zs[0] = vel_v[0] * twtt[0] / 2.0;
    let min_zs = zs.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_zs = zs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if vel_z[0] > min_zs {
        let idx = argmin(&vel_z);
        vel_v.insert(0, vel_v[idx]);
        vel_z.insert(0, min_zs);
    }
    if *vel_z.last().unwrap() < max_zs {
        let idx = argmax(&vel_z);
        vel_v.push(vel_v[idx]);
        vel_z.push(max_zs);
    }

    let vel_t: Vec<f64> = vel_z
        .iter()
        .zip(vel_v.iter())
        .map(|(&z, &v)| 2.0 * z / v)
        .collect();

    let tofz: Vec<f64> = zs.iter().map(|&z| linear_interp(&vel_z, &vel_t, z)).collect();
    let zoft: Vec<f64> = twtt.iter().map(|&t| linear_interp(&tofz, &zs, t)).collect();

    let available = *tofz.last().unwrap();
    let requested = *twtt.last().unwrap();
    if requested > available {
        return Err(MigrationError::OutOfRange {
            requested,
            available,
        });
    }

    let d = gradient_nonuniform(&twtt, &zoft);
    Ok(d.into_iter().map(|g| 2.0 * g).collect())
}

fn gridded_profile(
    rg: &Radargram,
    rows: &[(f64, f64, f64)],
) -> Result<Array2<f64>, MigrationError> {
    if rows.len() < 2 {
        return Err(MigrationError::InvalidVelocitySpec(
            "gridded velocity spec needs at least 2 rows".into(),
        ));
    }
    if rg.distance_unset() {
        return Err(MigrationError::DistanceUnset);
    }
    let s = rg.snum();
    let t = rg.tnum();
    let twtt = rg.twtt_seconds();

    let vel_v: Vec<f64> = rows.iter().map(|r| r.0).collect();
    let vel_z: Vec<f64> = rows.iter().map(|r| r.1).collect();
    let vel_x: Vec<f64> = rows.iter().map(|r| r.2).collect();

    let min_v = vel_v.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_v = vel_v.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let zs: Vec<f64> = if s == 1 {
        vec![min_v * twtt[0] / 2.0]
    } else {
        let start = min_v * twtt[0] / 2.0;
        let end = max_v * twtt[s - 1] / 2.0;
        (0..s)
            .map(|i| start + (end - start) * i as f64 / (s - 1) as f64)
            .collect()
    };

    // Nearest-neighbour grid the scattered (vel_x, vel_z, vel_v) points onto the (distance, zs)
    // mesh. Brute force: velocity tables in practice hold tens to low hundreds of rows.
    let mut vs = Array2::<f64>::zeros((s, t));
    for i in 0..s {
        for j in 0..t {
            let qx = rg.distance[j];
            let qz = zs[i];
            let mut best_idx = 0;
            let mut best_dist = f64::INFINITY;
            for k in 0..rows.len() {
                let dx = vel_x[k] - qx;
                let dz = vel_z[k] - qz;
                let d2 = dx * dx + dz * dz;
                if d2 < best_dist {
                    best_dist = d2;
                    best_idx = k;
                }
            }
            vs[(i, j)] = vel_v[best_idx];
        }
    }

    let mut vmig = Array2::<f64>::zeros((s, t));
    for j in 0..t {
        let col: Vec<f64> = (0..s).map(|i| vs[(i, j)]).collect();
        // Cumulative two-way time from the surface: vel_t[k] = 2 * integral_0^{zs[k]} dz/v(z).
        let mut vel_t = vec![0.0; s];
        for k in 0..s {
            let slowness: Vec<f64> = col[..=k].iter().map(|v| 1.0 / v).collect();
            vel_t[k] = 2.0 * trapz(&slowness, &zs[..=k]);
        }
        // Interpolating (zs, vel_t) back onto zs is an identity in exact arithmetic (the source
        // writes it as a general `interp1d` call before the scattered data has been gridded onto
        // a shared depth axis; after gridding, the two axes coincide). Kept as an explicit
        // re-interpolation rather than a bare clone so the algorithm matches the source 1:1.
        let tofz: Vec<f64> = zs.iter().map(|&z| linear_interp(&zs, &vel_t, z)).collect();
        let zoft: Vec<f64> = twtt.iter().map(|&tt| linear_interp(&tofz, &zs, tt)).collect();

        let available = *tofz.last().unwrap();
        let requested = *twtt.last().unwrap();
        if requested > available {
            return Err(MigrationError::OutOfRange {
                requested,
                available,
            });
        }

        let d = gradient_nonuniform(&twtt, &zoft);
        for i in 0..s {
            vmig[(i, j)] = 2.0 * d[i];
        }
    }
    Ok(vmig)
}

/// Parse a whitespace-delimited numeric velocity table (2 columns -> `Layered`, 3 columns ->
/// `Gridded`). Any I/O failure, unparseable value, or inconsistent column count is reported as
/// `VelocityFileUnreadable`.
pub fn parse_velocity_file<P: AsRef<Path>>(path: P) -> Result<VelocitySpec, MigrationError> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let text = fs::read_to_string(&path).map_err(|e| MigrationError::VelocityFileUnreadable {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let values: Result<Vec<f64>, _> = line.split_whitespace().map(|tok| tok.parse::<f64>()).collect();
        let values = values.map_err(|_| MigrationError::VelocityFileUnreadable {
            path: path.clone(),
            reason: format!("line {} contains a non-numeric value", lineno + 1),
        })?;
        rows.push(values);
    }

    if rows.is_empty() {
        return Err(MigrationError::VelocityFileUnreadable {
            path,
            reason: "file contains no data rows".into(),
        });
    }
    let ncols = rows[0].len();
    if !rows.iter().all(|r| r.len() == ncols) {
        return Err(MigrationError::VelocityFileUnreadable {
            path,
            reason: "inconsistent column count across rows".into(),
        });
    }
    match ncols {
        2 => Ok(VelocitySpec::Layered(
            rows.into_iter().map(|r| (r[0], r[1])).collect(),
        )),
        3 => Ok(VelocitySpec::Gridded(
            rows.into_iter().map(|r| (r[0], r[1], r[2])).collect(),
        )),
        other => Err(MigrationError::VelocityFileUnreadable {
            path,
            reason: format!("expected 2 or 3 columns, found {other}"),
        }),
    }
}
