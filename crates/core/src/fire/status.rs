//! Burn status encoding
//!
//! One scalar per grid point encodes the point's entire burn state:
//! - exactly `UNBURNED` (-1): burnable, never ignited
//! - any value above `UNBURNED`: burnable, ignited at that time
//! - any value below `UNBURNED`: permanently unburnable, with sub-ranges per
//!   barrier subtype (generic, control line, water, rock, road, trail)
//!
//! Every point belongs to exactly one category at any query time. Unburnable
//! points are fixed before a simulation starts and never transition; an
//! ignition time, once set, may only ever decrease (an earlier-arriving
//! wavelet wins).

use serde::{Deserialize, Serialize};

/// Subtype of a permanently unburnable point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrierKind {
    /// Generic unburnable terrain
    Unburnable,
    /// Hand line, dozer line, wet line, retardant line
    ControlLine,
    /// Standing water, river, stream, snow, ice
    Water,
    /// Bare rock, talus
    Rock,
    /// Paved or unpaved road
    Road,
    /// Foot or stock trail
    Trail,
}

/// The burn status of a single grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireStatus(f64);

impl FireStatus {
    /// Burnable, never ignited
    pub const UNBURNED: FireStatus = FireStatus(-1.0);

    /// Encode an ignition at `time` (non-negative simulation time)
    pub fn ignited_at(time: f64) -> Self {
        FireStatus(time)
    }

    /// Encode a permanently unburnable point of the given subtype
    pub fn barrier(kind: BarrierKind) -> Self {
        FireStatus(match kind {
            BarrierKind::Unburnable => -100.0,
            BarrierKind::ControlLine => -300.0,
            BarrierKind::Water => -400.0,
            BarrierKind::Rock => -500.0,
            BarrierKind::Road => -600.0,
            BarrierKind::Trail => -700.0,
        })
    }

    /// Raw encoded value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Ignition time, if this point has one
    pub fn ignition_time(self) -> Option<f64> {
        (self.0 > Self::UNBURNED.0).then_some(self.0)
    }

    /// TRUE if the point is unburned or burned (i.e. not a barrier)
    pub fn is_burnable(self) -> bool {
        self.0 >= Self::UNBURNED.0
    }

    /// TRUE if the point can never burn, regardless of time
    pub fn is_unburnable(self) -> bool {
        self.0 < Self::UNBURNED.0
    }

    /// TRUE if the point has an ignition time at or before `at_time`
    pub fn is_burned_at(self, at_time: f64) -> bool {
        self.0 > Self::UNBURNED.0 && self.0 <= at_time
    }

    /// TRUE if the point is either never ignited or ignites after `at_time`
    pub fn is_unburned_at(self, at_time: f64) -> bool {
        self.0 == Self::UNBURNED.0 || self.0 > at_time
    }
}
