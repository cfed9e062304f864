// gpr-migration - Kirchhoff, Stolt and phase-shift migration kernels for ground-penetrating radar

//! The shared data contract every migration engine consumes.

use ndarray::Array2;

use crate::error::MigrationError;

/// A single 2-D radargram: a dense sample matrix plus the geometry needed to migrate it.
///
/// `samples` is indexed `[sample_index, trace_index]` — rows run along the vertical (time) axis,
/// columns along the horizontally distributed traces.
#[derive(Clone, Debug)]
pub struct Radargram {
    /// Sample matrix, shape `(snum, tnum)`.
    pub samples: Array2<f64>,
    /// Sample interval along the time axis, in seconds.
    pub dt: f64,
    /// Two-way travel time of each sample row, in microseconds. Strictly increasing.
    pub travel_time: Vec<f64>,
    /// Per-trace horizontal spacing, in metres. `mean(trace_interval)` is the working `dx`.
    pub trace_interval: Vec<f64>,
    /// Cumulative horizontal position of each trace, in metres.
    pub distance: Vec<f64>,
}

impl Radargram {
    /// Number of samples per trace (`S`).
    pub fn snum(&self) -> usize {
        self.travel_time.len()
    }

    /// Number of traces (`T`).
    pub fn tnum(&self) -> usize {
        self.trace_interval.len()
    }

    /// Mean trace spacing, i.e. the working horizontal sample interval `dx`.
    pub fn dx(&self) -> f64 {
        self.trace_interval.iter().sum::<f64>() / self.trace_interval.len() as f64
    }

    /// Two-way travel time converted to seconds.
    pub fn twtt_seconds(&self) -> Vec<f64> {
        self.travel_time.iter().map(|t| t / 1e6).collect()
    }

    /// Check the invariants every `migrate_*` entry point relies on.
    ///
    /// Does not check the v(x,z)-only `distance` requirement — that is `VelocityField::build`'s
    /// job, since it only applies when a `Gridded` velocity spec is actually requested.
    pub fn validate(&self) -> Result<(), MigrationError> {
        let snum = self.snum();
        let tnum = self.tnum();
        let actual = (self.samples.nrows(), self.samples.ncols());
        if actual != (snum, tnum) {
            return Err(MigrationError::ShapeMismatch {
                expected: (snum, tnum),
                actual,
            });
        }
        if snum < 2 {
            return Err(MigrationError::InvalidVelocitySpec(
                "radargram must have at least 2 samples per trace".into(),
            ));
        }
        if tnum < 1 {
            return Err(MigrationError::InvalidVelocitySpec(
                "radargram must have at least 1 trace".into(),
            ));
        }
        if self.travel_time[0] <= 0.0 {
            return Err(MigrationError::InvalidVelocitySpec(
                "travel_time[0] must be > 0".into(),
            ));
        }
        if !self.travel_time.windows(2).all(|w| w[1] > w[0]) {
            return Err(MigrationError::InvalidVelocitySpec(
                "travel_time must be strictly increasing".into(),
            ));
        }
        if !(self.dt > 0.0) {
            return Err(MigrationError::InvalidVelocitySpec(
                "dt must be > 0".into(),
            ));
        }
        if !(self.dx() > 0.0) {
            return Err(MigrationError::InvalidVelocitySpec(
                "mean(trace_interval) must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// `true` if every entry of `distance` is zero, i.e. the field was never populated.
    pub(crate) fn distance_unset(&self) -> bool {
        self.distance.iter().all(|&d| d == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_radargram(snum: usize, tnum: usize) -> Radargram {
        Radargram {
            samples: Array2::zeros((snum, tnum)),
            dt: 10e-9,
            travel_time: (0..snum).map(|i| 100.0 + i as f64 * 20.0).collect(),
            trace_interval: vec![1.0; tnum],
            distance: (0..tnum).map(|i| i as f64).collect(),
        }
    }

    #[test]
    fn validate_accepts_well_formed_radargram() {
        let rg = flat_radargram(64, 32);
        assert!(rg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_shape_mismatch() {
        let mut rg = flat_radargram(500, 400);
        rg.samples = Array2::zeros((499, 400));
        match rg.validate() {
            Err(MigrationError::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, (500, 400));
                assert_eq!(actual, (499, 400));
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_non_monotonic_travel_time() {
        let mut rg = flat_radargram(8, 4);
        rg.travel_time[3] = rg.travel_time[2];
        assert!(rg.validate().is_err());
    }

    #[test]
    fn distance_unset_detects_all_zero() {
        let mut rg = flat_radargram(8, 4);
        rg.distance = vec![0.0; 4];
        assert!(rg.distance_unset());
        rg.distance[2] = 3.0;
        assert!(!rg.distance_unset());
    }
}
