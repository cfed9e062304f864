// gpr-migration - Kirchhoff, Stolt and phase-shift migration kernels for ground-penetrating radar

//! Seismic/radar migration core: Kirchhoff, Stolt and Gazdag/phase-shift migration kernels
//! operating on a shared 2-D radargram data model.
//!
//! Migration repositions reflected energy recorded as a function of two-way travel time at the
//! surface to its true spatial origin in the subsurface, collapsing diffraction hyperbolas to
//! point scatterers and moving dipping reflectors up-dip. This crate implements three algorithms
//! over the same [`Radargram`] contract:
//!
//! - [`migrate_kirchhoff`] - diffraction summation in the space-time domain.
//! - [`migrate_stolt`] - constant-velocity f-k migration via a 2-D FFT remapping.
//! - [`migrate_phaseshift`] - Gazdag recursive downward continuation, for constant, depth-varying
//!   (v(z)), or laterally varying (v(x,z)) velocity.
//!
//! File I/O of whole radargrams, CLI argument parsing, preprocessing filters (gain, band-pass,
//! dewow) and plotting are out of scope: callers hand this crate a fully populated [`Radargram`],
//! one of the three `migrate_*` functions mutates its sample matrix, and the same value is
//! returned.
//!
//! Usage
//! -----
//! ```
//! use gpr_migration::{migrate_stolt, Radargram};
//! use ndarray::Array2;
//!
//! let snum = 64;
//! let tnum = 32;
//! let mut samples = Array2::zeros((snum, tnum));
//! samples[(40, 16)] = 1.0;
//! let rg = Radargram {
//!     samples,
//!     dt: 0.8e-9,
//!     travel_time: (1..=snum).map(|i| i as f64 * 0.8e-9 * 1e6).collect(),
//!     trace_interval: vec![0.1; tnum],
//!     distance: (0..tnum).map(|i| i as f64 * 0.1).collect(),
//! };
//! let migrated = migrate_stolt(rg, 1.68e8).unwrap();
//! assert_eq!(migrated.samples.dim(), (snum, tnum));
//! ```

mod error;
mod fft;
mod fourier_fd;
mod kirchhoff;
mod phase_shift;
mod radargram;
mod stencil;
mod stolt;
mod velocity;

pub use error::MigrationError;
pub use kirchhoff::migrate_kirchhoff;
pub use phase_shift::migrate_phaseshift;
pub use radargram::Radargram;
pub use stolt::migrate_stolt;
pub use velocity::{parse_velocity_file, VelocityField, VelocitySpec};

/// Default Kirchhoff migration velocity: speed of radio waves in glacial ice, in m/s.
pub const DEFAULT_KIRCHHOFF_VELOCITY: f64 = 1.69e8;
/// Default Stolt migration velocity: speed of radio waves in glacial ice, in m/s.
pub const DEFAULT_STOLT_VELOCITY: f64 = 1.68e8;
