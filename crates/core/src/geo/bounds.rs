//! Rectangular geographic extent with fixed grid-line spacing
//!
//! `GeoBounds` is the indexing layer of the engine: it snaps arbitrary
//! coordinates onto its grid lines, maps coordinates to zero-based
//! column/row intervals, and enumerates the grid lines crossed by a
//! traversal between two coordinate values.

use serde::{Deserialize, Serialize};

use crate::error::FireGrowthError;

/// A rectangular, axis-aligned geographic extent (bounding box) with a fixed
/// spacing between neighboring x-axis (west-to-east) and y-axis
/// (north-to-south) grid lines.
///
/// Immutable after construction. Every valid grid coordinate is reachable as
/// `west + i * x_spacing` / `north - j * y_spacing` for `i ∈ [0, cols)`,
/// `j ∈ [0, rows)`; row 0 is the northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    west: f64,
    north: f64,
    east: f64,
    south: f64,
    x_spacing: f64,
    y_spacing: f64,
}

impl GeoBounds {
    /// Create a bounding box from its upper-left and lower-right corners and
    /// the grid spacing on each axis.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::Configuration` unless `west < east`,
    /// `north > south`, and both spacings are positive.
    pub fn new(
        west: f64,
        north: f64,
        east: f64,
        south: f64,
        x_spacing: f64,
        y_spacing: f64,
    ) -> Result<Self, FireGrowthError> {
        if west >= east {
            return Err(FireGrowthError::Configuration {
                reason: format!("west {} must be less than east {}", west, east),
            });
        }
        if north <= south {
            return Err(FireGrowthError::Configuration {
                reason: format!("north {} must be greater than south {}", north, south),
            });
        }
        if x_spacing <= 0.0 || y_spacing <= 0.0 {
            return Err(FireGrowthError::Configuration {
                reason: format!(
                    "spacings must be positive, got x {} y {}",
                    x_spacing, y_spacing
                ),
            });
        }
        Ok(Self {
            west,
            north,
            east,
            south,
            x_spacing,
            y_spacing,
        })
    }

    /// X coordinate of the western edge
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Y coordinate of the northern edge
    pub fn north(&self) -> f64 {
        self.north
    }

    /// X coordinate of the eastern edge
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Y coordinate of the southern edge
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Distance between x-axis grid lines
    pub fn x_spacing(&self) -> f64 {
        self.x_spacing
    }

    /// Distance between y-axis grid lines
    pub fn y_spacing(&self) -> f64 {
        self.y_spacing
    }

    /// Width of the bounding box
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height of the bounding box
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Number of x-axis grid lines (columns)
    pub fn cols(&self) -> usize {
        1 + (self.width() / self.x_spacing).ceil() as usize
    }

    /// Number of y-axis grid lines (rows)
    pub fn rows(&self) -> usize {
        1 + (self.height() / self.y_spacing).ceil() as usize
    }

    /// Total number of grid points within the bounds
    pub fn cells(&self) -> usize {
        self.cols() * self.rows()
    }

    /// TRUE if `x` is within the western and eastern edges (inclusive)
    pub fn x_inbounds(&self, x: f64) -> bool {
        x >= self.west && x <= self.east
    }

    /// TRUE if `y` is within the northern and southern edges (inclusive)
    pub fn y_inbounds(&self, y: f64) -> bool {
        y <= self.north && y >= self.south
    }

    /// TRUE if `[x, y]` is within the bounds (inclusive on all four edges)
    pub fn inbounds(&self, x: f64, y: f64) -> bool {
        self.x_inbounds(x) && self.y_inbounds(y)
    }

    /// Closest exact grid-line x for `x`, ties rounding half-up
    pub fn snap_x(&self, x: f64) -> f64 {
        self.west + self.x_spacing * round_half_up((x - self.west) / self.x_spacing)
    }

    /// Closest exact grid-line y for `y`, ties rounding half-up
    pub fn snap_y(&self, y: f64) -> f64 {
        self.north - self.y_spacing * round_half_up((self.north - y) / self.y_spacing)
    }

    /// Zero-based column of the grid line at or immediately west of `x`.
    ///
    /// `x` must be in bounds; guarded callers check first.
    pub fn x_interval(&self, x: f64) -> usize {
        ((x - self.west) / self.x_spacing).floor() as usize
    }

    /// Zero-based row of the grid line at or immediately north of `y`
    /// (row 0 is the northern edge).
    ///
    /// `y` must be in bounds; guarded callers check first.
    pub fn y_interval(&self, y: f64) -> usize {
        ((self.north - y) / self.y_spacing).floor() as usize
    }

    /// All x-axis grid lines crossed when traversing from `x0` to `x1`
    pub fn x_crossings(&self, x0: f64, x1: f64) -> Vec<f64> {
        Self::crossings(x0, x1, self.x_spacing)
    }

    /// All y-axis grid lines crossed when traversing from `y0` to `y1`
    pub fn y_crossings(&self, y0: f64, y1: f64) -> Vec<f64> {
        Self::crossings(y0, y1, self.y_spacing)
    }

    /// Every grid-line value strictly between `p0` and `p1`, in traversal
    /// order. A value exactly ON a line at `p0` is not crossed (the mover is
    /// already in that cell); the endpoint `p1` is included when it lies
    /// exactly on a line.
    pub fn crossings(p0: f64, p1: f64, spacing: f64) -> Vec<f64> {
        let mut ticks = Vec::new();
        if p0 < p1 {
            // traversing west-to-east or south-to-north
            let mut k = (p0 / spacing).floor() + 1.0;
            while k * spacing <= p1 {
                ticks.push(k * spacing);
                k += 1.0;
            }
        } else {
            // traversing east-to-west or north-to-south
            let mut k = (p0 / spacing).ceil() - 1.0;
            while k * spacing >= p1 {
                ticks.push(k * spacing);
                k -= 1.0;
            }
        }
        ticks
    }
}

/// Round to the nearest integer, ties going up (toward +infinity)
fn round_half_up(t: f64) -> f64 {
    (t + 0.5).floor()
}
