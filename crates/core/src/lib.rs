//! Point fire growth engine
//!
//! Grows a wildfire across a geographic point grid using Huygens' Principle:
//! every point on the fire perimeter acts as an independent ignition source
//! whose free-burning wavelet is an ellipse determined by the local burning
//! conditions. Each grid point stores the time the fire first arrives, so
//! the full fire history falls out of a single scalar field.
//!
//! The simulation loop is period-driven:
//! - ignite one or more points and paint any barriers onto a
//!   [`FireStateGrid`]
//! - call [`FireStateGrid::advance_period`] once per time window; each call
//!   takes a census of the perimeter and overlays one ignition template per
//!   perimeter point
//! - query burn status, censuses, or period statistics at any time
//!
//! Burning conditions and fire behavior come from caller-supplied
//! [`FireInputProvider`] and [`FireBehaviorProvider`] implementations;
//! templates are cached per distinct set of conditions.

// Geographic indexing and storage
pub mod geo;

// Fire growth state machine
pub mod fire;

pub mod error;

// Re-export the engine surface
pub use error::{Axis, FireGrowthError};
pub use fire::{
    BarrierKind, ConstantFireBehaviorProvider, ConstantFireInputProvider, Direction, EllipsePoint,
    FireBehavior, FireBehaviorProvider, FireEllipse, FireInput, FireInputProvider, FireStateGrid,
    FireStatus, GridCensus, IgnitionTemplate, IgnitionTemplateCache, OverlayStats, Period,
    PeriodStats,
};
pub use geo::{GeoBounds, GeoCoord, GeoGrid, GeoTimeCoord};
