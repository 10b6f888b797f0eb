//! Elliptical fire growth geometry
//!
//! Under Huygens' Principle every point on a fire perimeter is treated as an
//! independent ignition source whose free-burning shape, under constant
//! conditions, is an ellipse with the ignition point at the rear focus. This
//! module provides that geometry: given the heading spread rate, the
//! length-to-width ratio, the heading, and the elapsed burning time, it
//! answers "how far and how soon does the wavelet reach offset (dx, dy)".
//!
//! The spread rate at angle β from the heading follows the polar form of an
//! ellipse about its rear focus:
//!
//! `r(β) = head_rate × (1 − e) / (1 − e·cos β)`
//!
//! where `e` is the eccentricity derived from the length-to-width ratio. At
//! β = 0 this reduces to the heading rate, at β = π to the backing rate.

use serde::{Deserialize, Serialize};

use crate::error::FireGrowthError;

/// Distance and fire arrival time for one local offset from the ignition
/// point at the ellipse origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipsePoint {
    /// Straight-line distance from the ignition point
    pub distance: f64,
    /// Time for the wavelet to reach the offset
    pub arrival_time: f64,
}

/// A fire ellipse anchored at its rear focus.
///
/// Pure geometry: the physical model that produced the heading rate and
/// length-to-width ratio lives behind `FireBehaviorProvider`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireEllipse {
    head_rate: f64,
    back_rate: f64,
    eccentricity: f64,
    length_to_width: f64,
    heading_degrees: f64,
    /// Unit vector of the heading (east component, north component)
    heading_unit: (f64, f64),
    elapsed: f64,
}

impl FireEllipse {
    /// Build an ellipse from the heading spread rate (distance per unit
    /// time), the length-to-width ratio, the heading (degrees clockwise from
    /// north), and the elapsed burning time.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::Configuration` unless `head_rate > 0`,
    /// `length_to_width >= 1`, and `elapsed > 0`.
    pub fn new(
        head_rate: f64,
        length_to_width: f64,
        heading_degrees: f64,
        elapsed: f64,
    ) -> Result<Self, FireGrowthError> {
        if head_rate <= 0.0 {
            return Err(FireGrowthError::Configuration {
                reason: format!("heading spread rate {} must be positive", head_rate),
            });
        }
        if length_to_width < 1.0 {
            return Err(FireGrowthError::Configuration {
                reason: format!("length-to-width ratio {} must be >= 1", length_to_width),
            });
        }
        if elapsed <= 0.0 {
            return Err(FireGrowthError::Configuration {
                reason: format!("elapsed time {} must be positive", elapsed),
            });
        }
        let eccentricity = (length_to_width * length_to_width - 1.0).sqrt() / length_to_width;
        let back_rate = head_rate * (1.0 - eccentricity) / (1.0 + eccentricity);
        let radians = heading_degrees.to_radians();
        Ok(Self {
            head_rate,
            back_rate,
            eccentricity,
            length_to_width,
            heading_degrees,
            heading_unit: (radians.sin(), radians.cos()),
            elapsed,
        })
    }

    /// Spread rate toward the heading
    pub fn head_rate(&self) -> f64 {
        self.head_rate
    }

    /// Spread rate directly against the heading
    pub fn back_rate(&self) -> f64 {
        self.back_rate
    }

    /// Length-to-width ratio of the ellipse
    pub fn length_to_width(&self) -> f64 {
        self.length_to_width
    }

    /// Heading in degrees clockwise from north
    pub fn heading_degrees(&self) -> f64 {
        self.heading_degrees
    }

    /// Elapsed burning time the ellipse is scaled to
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Total length (head spread plus back spread) after the elapsed time
    pub fn length(&self) -> f64 {
        (self.head_rate + self.back_rate) * self.elapsed
    }

    /// Total width after the elapsed time
    pub fn width(&self) -> f64 {
        self.length() / self.length_to_width
    }

    /// Distance and arrival time for a wavelet traveling from the ignition
    /// point at the origin to the local offset `(dx, dy)`.
    ///
    /// The offset at the origin itself arrives at time zero.
    pub fn point_at(&self, dx: f64, dy: f64) -> EllipsePoint {
        let distance = dx.hypot(dy);
        if distance == 0.0 {
            return EllipsePoint {
                distance: 0.0,
                arrival_time: 0.0,
            };
        }
        let (hx, hy) = self.heading_unit;
        let cos_beta = (dx * hx + dy * hy) / distance;
        let rate = self.head_rate * (1.0 - self.eccentricity)
            / (1.0 - self.eccentricity * cos_beta);
        EllipsePoint {
            distance,
            arrival_time: distance / rate,
        }
    }
}
