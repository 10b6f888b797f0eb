//! Geographic bounds, coordinate indexing, and dense geography-indexed storage
//!
//! The convention used for point arguments is `[x, y]`, i.e.
//! `[easting, northing]`; rectangles are given as upper-left then lower-right,
//! i.e. `west, north, east, south`.

mod bounds;
mod coord;
mod grid;

pub use bounds::GeoBounds;
pub use coord::{GeoCoord, GeoTimeCoord};
pub use grid::GeoGrid;
