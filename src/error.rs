// gpr-migration - Kirchhoff, Stolt and phase-shift migration kernels for ground-penetrating radar

//! Error taxonomy for the migration core.
//!
//! All variants are fatal to the `migrate_*` call that raised them: there is no retry protocol
//! and no partial migration is ever returned (see the crate-level docs).

use std::path::PathBuf;

/// Errors raised by the migration core.
///
/// New variants may be added in a minor release, so callers should not rely on matching
/// exhaustively over this enum.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// `samples` dimensions do not match the radargram's declared `(snum, tnum)`.
    #[error("samples shape {actual:?} does not match expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Wrong column count, fewer than 2 rows for layered/gridded, or non-monotonic depths.
    #[error("invalid velocity specification: {0}")]
    InvalidVelocitySpec(String),

    /// A v(x,z) migration was requested but every `distance` entry is zero.
    #[error("distance vector was never set (all entries are zero)")]
    DistanceUnset,

    /// The requested two-way time exceeds the interpolable range of the velocity model.
    #[error("requested two-way time {requested} exceeds interpolation range (max {available})")]
    OutOfRange { requested: f64, available: f64 },

    /// The supplied velocity-table file could not be read or parsed.
    #[error("velocity file {path:?} could not be read: {reason}")]
    VelocityFileUnreadable { path: PathBuf, reason: String },

    /// Reserved for future use by the finite-difference branch; never constructed today.
    #[error("filter instability")]
    FilterInstability,
}
