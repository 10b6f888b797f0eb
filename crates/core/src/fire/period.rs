//! Burning period bookkeeping
//!
//! A period is a half-open simulation time window `[begins, ends)`: `begins`
//! IS within the period, `ends` is NOT. Conditions are assumed constant per
//! ignition point for the length of one period, so periods should be brief
//! (on the order of minutes).

use serde::{Deserialize, Serialize};

use crate::error::FireGrowthError;

/// A half-open burning period with a sequence number.
///
/// A fresh period is the degenerate `[0, 0)` window numbered 0; each
/// `advance` moves `begins` to the previous `ends` and increments the number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Period {
    begins: f64,
    ends: f64,
    number: u32,
}

impl Period {
    /// The pre-simulation period `[0, 0)` numbered 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of the window (within the period)
    pub fn begins(&self) -> f64 {
        self.begins
    }

    /// End of the window (NOT within the period)
    pub fn ends(&self) -> f64 {
        self.ends
    }

    /// Sequence number, incremented once per advance
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Length of the window
    pub fn duration(&self) -> f64 {
        self.ends - self.begins
    }

    /// Midpoint of the window
    pub fn midpoint(&self) -> f64 {
        self.begins + self.duration() / 2.0
    }

    /// TRUE if time `t` falls within the half-open window
    pub fn contains(&self, t: f64) -> bool {
        t >= self.begins && t < self.ends
    }

    /// Begin the next period: the new window starts where the old one ended
    /// and runs for `duration`.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::Configuration` if `duration` is not positive.
    pub fn advance(&mut self, duration: f64) -> Result<(), FireGrowthError> {
        if duration <= 0.0 {
            return Err(FireGrowthError::Configuration {
                reason: format!("period duration {} must be positive", duration),
            });
        }
        self.begins = self.ends;
        self.ends += duration;
        self.number += 1;
        Ok(())
    }
}
