//! Planar geographic point value types

use serde::{Deserialize, Serialize};

/// A point in a planar geographic system with an x-axis that increases
/// west-to-east and a y-axis that increases south-to-north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
}

impl GeoCoord {
    /// Create a point from easting and northing
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A grid point tagged with its ignition time.
///
/// Produced by the perimeter census: conditions at a perimeter point are
/// sampled at the point's own (possibly historical) ignition time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTimeCoord {
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
    /// Ignition time of the point
    pub time: f64,
}

impl GeoTimeCoord {
    /// Create a point tagged with an ignition time
    pub fn new(x: f64, y: f64, time: f64) -> Self {
        Self { x, y, time }
    }
}
