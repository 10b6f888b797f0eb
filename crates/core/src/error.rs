//! Error taxonomy for the fire growth engine
//!
//! Every fallible operation in the crate returns `FireGrowthError`. Errors are
//! always propagated to the caller, never swallowed; the only intentional
//! no-op outcomes in the engine are `FireStateGrid::ignite_at` on a cell that
//! is not unburned and `FireStateGrid::advance_period` reporting an empty
//! perimeter.

use std::fmt;

/// Coordinate axis named by out-of-bounds reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// West-to-east axis (easting)
    X,
    /// South-to-north axis (northing)
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Errors surfaced by the fire growth engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FireGrowthError {
    /// Malformed construction input: inverted bounds, non-positive spacing,
    /// degenerate ellipse, zero cache capacity, non-positive period duration.
    Configuration {
        /// What was malformed
        reason: String,
    },
    /// A guarded coordinate access fell outside the grid bounds.
    /// Recoverable; indicates a caller bug. Checked per axis so the report
    /// names the offending axis.
    OutOfBounds {
        /// The axis on which the coordinate is out of range
        axis: Axis,
        /// The offending coordinate value
        value: f64,
        /// Lowest in-bounds value on that axis
        min: f64,
        /// Highest in-bounds value on that axis
        max: f64,
    },
    /// An external input or behavior provider failed. Not retried, not
    /// masked; surfaces out of `advance_period` untouched.
    Provider {
        /// Provider's own failure description
        reason: String,
    },
    /// An internal invariant was violated (e.g. the overlay walk exceeded its
    /// work budget). Indicates a bug in the engine itself; must be loud.
    InvariantViolation {
        /// Which invariant broke
        reason: String,
    },
}

impl fmt::Display for FireGrowthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireGrowthError::Configuration { reason } => {
                write!(f, "invalid configuration: {}", reason)
            }
            FireGrowthError::OutOfBounds {
                axis,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "{}-coordinate {} is out-of-bounds {} - {}",
                    axis, value, min, max
                )
            }
            FireGrowthError::Provider { reason } => write!(f, "provider failure: {}", reason),
            FireGrowthError::InvariantViolation { reason } => {
                write!(f, "internal invariant violated: {}", reason)
            }
        }
    }
}

impl std::error::Error for FireGrowthError {}
