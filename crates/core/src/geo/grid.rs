//! Dense geography-indexed storage
//!
//! `GeoGrid` stores one value per grid point of a `GeoBounds`, flat in
//! row-major order (row 0 is the northern edge, column 0 the western edge).
//! Coordinate access comes in two flavors: guarded methods that fail with an
//! out-of-bounds error naming the offending axis, and unguarded methods for
//! hot paths that have already validated their coordinates.

use crate::error::{Axis, FireGrowthError};
use crate::geo::GeoBounds;

/// Dense grid of values addressed by geographic coordinate.
///
/// Batch helpers iterate in a fixed, deterministic order (north to south,
/// west to east) so downstream consumers see reproducible orderings.
#[derive(Debug, Clone)]
pub struct GeoGrid<T> {
    bounds: GeoBounds,
    data: Vec<T>,
}

impl<T: Copy> GeoGrid<T> {
    /// Create a grid over `bounds` with every cell set to `default`
    pub fn new(bounds: GeoBounds, default: T) -> Self {
        Self {
            bounds,
            data: vec![default; bounds.cells()],
        }
    }

    /// Wrap an existing row-major cell vector.
    ///
    /// `data.len()` must equal `bounds.cells()`.
    pub(crate) fn from_parts(bounds: GeoBounds, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), bounds.cells());
        Self { bounds, data }
    }

    /// The geographic extent this grid is indexed by
    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Total number of grid columns
    pub fn cols(&self) -> usize {
        self.bounds.cols()
    }

    /// Total number of grid rows
    pub fn rows(&self) -> usize {
        self.bounds.rows()
    }

    /// Total number of grid cells
    pub fn cells(&self) -> usize {
        self.data.len()
    }

    /// Flat view of the cell data in row-major order
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Flat index of the cell at `[col, row]`
    pub fn idx(&self, col: usize, row: usize) -> usize {
        col + row * self.cols()
    }

    /// Coordinate of the grid point at `[col, row]`
    pub fn coord_of(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.bounds.west() + col as f64 * self.bounds.x_spacing(),
            self.bounds.north() - row as f64 * self.bounds.y_spacing(),
        )
    }

    /// Column of `x`, or an out-of-bounds error naming the x axis
    pub fn guard_x(&self, x: f64) -> Result<usize, FireGrowthError> {
        if self.bounds.x_inbounds(x) {
            Ok(self.bounds.x_interval(x))
        } else {
            Err(FireGrowthError::OutOfBounds {
                axis: Axis::X,
                value: x,
                min: self.bounds.west(),
                max: self.bounds.east(),
            })
        }
    }

    /// Row of `y`, or an out-of-bounds error naming the y axis
    pub fn guard_y(&self, y: f64) -> Result<usize, FireGrowthError> {
        if self.bounds.y_inbounds(y) {
            Ok(self.bounds.y_interval(y))
        } else {
            Err(FireGrowthError::OutOfBounds {
                axis: Axis::Y,
                value: y,
                min: self.bounds.south(),
                max: self.bounds.north(),
            })
        }
    }

    /// Value of the cell containing `[x, y]` (guarded)
    pub fn get(&self, x: f64, y: f64) -> Result<T, FireGrowthError> {
        let col = self.guard_x(x)?;
        let row = self.guard_y(y)?;
        Ok(self.data[self.idx(col, row)])
    }

    /// Set the cell containing `[x, y]` to `value` (guarded)
    pub fn set(&mut self, x: f64, y: f64, value: T) -> Result<(), FireGrowthError> {
        let col = self.guard_x(x)?;
        let row = self.guard_y(y)?;
        let idx = self.idx(col, row);
        self.data[idx] = value;
        Ok(())
    }

    /// Value of the cell containing `[x, y]`, skipping the bounds guard.
    ///
    /// The coordinate must already be known in-bounds.
    pub fn get_unguarded(&self, x: f64, y: f64) -> T {
        self.data[self.idx(self.bounds.x_interval(x), self.bounds.y_interval(y))]
    }

    /// Set the cell containing `[x, y]`, skipping the bounds guard.
    ///
    /// The coordinate must already be known in-bounds.
    pub fn set_unguarded(&mut self, x: f64, y: f64, value: T) {
        let idx = self.idx(self.bounds.x_interval(x), self.bounds.y_interval(y));
        self.data[idx] = value;
    }

    /// Fill every cell with `value`
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Invoke `f(x, y, value)` for every cell, north to south then west to
    /// east within each row
    pub fn each_cell(&self, mut f: impl FnMut(f64, f64, T)) {
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let (x, y) = self.coord_of(col, row);
                f(x, y, self.data[self.idx(col, row)]);
            }
        }
    }

    /// Values of the horizontal run at `y` from `from_x` through `thru_x`,
    /// in `from`-to-`thru` order
    pub fn get_row(&self, y: f64, from_x: f64, thru_x: f64) -> Result<Vec<T>, FireGrowthError> {
        self.get_rect(from_x, y, thru_x, y)
    }

    /// Values of the vertical run at `x` from `from_y` through `thru_y`,
    /// in `from`-to-`thru` order
    pub fn get_col(&self, x: f64, from_y: f64, thru_y: f64) -> Result<Vec<T>, FireGrowthError> {
        self.get_rect(x, from_y, x, thru_y)
    }

    /// Values within the rectangle `[from_x, from_y]` to `[thru_x, thru_y]`,
    /// row by row in `from_y`-to-`thru_y` order, each row in
    /// `from_x`-to-`thru_x` order
    pub fn get_rect(
        &self,
        from_x: f64,
        from_y: f64,
        thru_x: f64,
        thru_y: f64,
    ) -> Result<Vec<T>, FireGrowthError> {
        let c0 = self.guard_x(from_x)?;
        let c1 = self.guard_x(thru_x)?;
        let r0 = self.guard_y(from_y)?;
        let r1 = self.guard_y(thru_y)?;
        let cols = ordered(c0, c1);
        let mut values = Vec::with_capacity(cols.len() * (r0.abs_diff(r1) + 1));
        for row in ordered(r0, r1) {
            for &col in &cols {
                values.push(self.data[self.idx(col, row)]);
            }
        }
        Ok(values)
    }

    /// Set the horizontal run at `y` from `from_x` through `thru_x`
    pub fn set_row(
        &mut self,
        y: f64,
        from_x: f64,
        thru_x: f64,
        value: T,
    ) -> Result<(), FireGrowthError> {
        self.set_rect(from_x, y, thru_x, y, value)
    }

    /// Set the vertical run at `x` from `from_y` through `thru_y`
    pub fn set_col(
        &mut self,
        x: f64,
        from_y: f64,
        thru_y: f64,
        value: T,
    ) -> Result<(), FireGrowthError> {
        self.set_rect(x, from_y, x, thru_y, value)
    }

    /// Set every cell in the rectangle spanned by the two corners
    /// (corner order does not matter)
    pub fn set_rect(
        &mut self,
        from_x: f64,
        from_y: f64,
        thru_x: f64,
        thru_y: f64,
        value: T,
    ) -> Result<(), FireGrowthError> {
        let c0 = self.guard_x(from_x)?;
        let c1 = self.guard_x(thru_x)?;
        let r0 = self.guard_y(from_y)?;
        let r1 = self.guard_y(thru_y)?;
        for row in r0.min(r1)..=r0.max(r1) {
            for col in c0.min(c1)..=c0.max(c1) {
                let idx = self.idx(col, row);
                self.data[idx] = value;
            }
        }
        Ok(())
    }
}

/// Inclusive index run from `a` through `b`, in that direction
fn ordered(a: usize, b: usize) -> Vec<usize> {
    if a <= b {
        (a..=b).collect()
    } else {
        (b..=a).rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Axis;

    fn grid() -> GeoGrid<f64> {
        let bounds = GeoBounds::new(1000.0, 5000.0, 2000.0, 4000.0, 10.0, 10.0).unwrap();
        GeoGrid::new(bounds, 0.0)
    }

    #[test]
    fn test_dimensions_and_default() {
        let g = grid();
        assert_eq!(g.cols(), 101);
        assert_eq!(g.rows(), 101);
        assert_eq!(g.cells(), 10201);
        assert_eq!(g.data().len(), 10201);
        assert_eq!(g.data()[1234], 0.0);
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut g = grid();
        g.set(1500.0, 4500.0, 7.5).unwrap();
        assert_eq!(g.get(1500.0, 4500.0).unwrap(), 7.5);
        // Same cell through an off-line coordinate in the same interval
        assert_eq!(g.get(1509.0, 4500.0).unwrap(), 7.5);
        // Row-major placement: col 50, row 50
        assert_eq!(g.data()[50 + 50 * 101], 7.5);
    }

    #[test]
    fn test_guard_names_offending_axis() {
        let mut g = grid();
        match g.get(999.0, 4500.0) {
            Err(FireGrowthError::OutOfBounds { axis, value, .. }) => {
                assert_eq!(axis, Axis::X);
                assert_eq!(value, 999.0);
            }
            other => panic!("expected x out-of-bounds, got {:?}", other),
        }
        match g.set(1500.0, 5001.0, 1.0) {
            Err(FireGrowthError::OutOfBounds { axis, .. }) => assert_eq!(axis, Axis::Y),
            other => panic!("expected y out-of-bounds, got {:?}", other),
        }
    }

    #[test]
    fn test_fill() {
        let mut g = grid();
        g.fill(-1.0);
        assert!(g.data().iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_each_cell_order_north_to_south_west_to_east() {
        let bounds = GeoBounds::new(0.0, 20.0, 20.0, 0.0, 10.0, 10.0).unwrap();
        let g = GeoGrid::new(bounds, 0u8);
        let mut seen = Vec::new();
        g.each_cell(|x, y, _| seen.push((x, y)));
        assert_eq!(seen.len(), 9);
        assert_eq!(seen[0], (0.0, 20.0));
        assert_eq!(seen[1], (10.0, 20.0));
        assert_eq!(seen[3], (0.0, 10.0));
        assert_eq!(seen[8], (20.0, 0.0));
    }

    #[test]
    fn test_set_col_and_row() {
        let mut g = grid();
        // Corner order does not matter for setters
        g.set_col(1250.0, 4250.0, 4750.0, 9.0).unwrap();
        g.set_row(4750.0, 1250.0, 1750.0, 9.0).unwrap();
        assert_eq!(g.get(1250.0, 4750.0).unwrap(), 9.0);
        assert_eq!(g.get(1250.0, 4250.0).unwrap(), 9.0);
        assert_eq!(g.get(1750.0, 4750.0).unwrap(), 9.0);
        assert_eq!(g.get(1250.0, 4500.0).unwrap(), 9.0);
        assert_eq!(g.get(1500.0, 4750.0).unwrap(), 9.0);
        assert_eq!(g.get(1510.0, 4740.0).unwrap(), 0.0);
        let painted = g.data().iter().filter(|&&v| v == 9.0).count();
        assert_eq!(painted, 101); // 51 + 51 minus the shared corner
    }

    #[test]
    fn test_get_rect_preserves_direction_order() {
        let bounds = GeoBounds::new(0.0, 20.0, 20.0, 0.0, 10.0, 10.0).unwrap();
        let mut g = GeoGrid::new(bounds, 0i32);
        let mut n = 0;
        for row in 0..3 {
            for col in 0..3 {
                let (x, y) = g.coord_of(col, row);
                g.set(x, y, n).unwrap();
                n += 1;
            }
        }
        // North-west to south-east
        assert_eq!(
            g.get_rect(0.0, 20.0, 20.0, 0.0).unwrap(),
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8]
        );
        // South-east to north-west reverses both axes
        assert_eq!(
            g.get_rect(20.0, 0.0, 0.0, 20.0).unwrap(),
            vec![8, 7, 6, 5, 4, 3, 2, 1, 0]
        );
        // Single row west-to-east and east-to-west
        assert_eq!(g.get_row(10.0, 0.0, 20.0).unwrap(), vec![3, 4, 5]);
        assert_eq!(g.get_row(10.0, 20.0, 0.0).unwrap(), vec![5, 4, 3]);
        // Single column north-to-south
        assert_eq!(g.get_col(10.0, 20.0, 0.0).unwrap(), vec![1, 4, 7]);
    }

    #[test]
    fn test_unguarded_matches_guarded() {
        let mut g = grid();
        g.set_unguarded(1510.0, 4490.0, 3.25);
        assert_eq!(g.get(1510.0, 4490.0).unwrap(), 3.25);
        assert_eq!(g.get_unguarded(1510.0, 4490.0), 3.25);
    }
}
