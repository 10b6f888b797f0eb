//! Fire state grid and the burning period loop
//!
//! `FireStateGrid` owns the burn status of every grid point, the current
//! burning period, and the collaborators that turn conditions into ignition
//! templates. Growing the fire is a loop of `advance_period` calls: each one
//! opens the next time window, takes a census of the fire perimeter at the
//! window's start, and overlays one ignition template per perimeter point.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::FireGrowthError;
use crate::fire::cache::IgnitionTemplateCache;
use crate::fire::period::Period;
use crate::fire::provider::{FireBehaviorProvider, FireInputProvider};
use crate::fire::status::{BarrierKind, FireStatus};
use crate::fire::template::Direction;
use crate::geo::{GeoBounds, GeoCoord, GeoGrid, GeoTimeCoord};

/// Templates kept before evicting the least recently used
pub const DEFAULT_TEMPLATE_CAPACITY: usize = 64;

/// Snapshot of the fire's shape at one point in time
#[derive(Debug, Clone, Serialize)]
pub struct GridCensus {
    /// Burned points with at least one burnable, unburned neighbor, in
    /// deterministic north-to-south, west-to-east order, each carrying its
    /// ignition time
    pub perimeter: Vec<GeoTimeCoord>,
    /// Histogram of burned points by their number of open faces (0 through 4)
    pub open_faces: [usize; 5],
    /// Points burned at or before the census time
    pub burned: usize,
    /// Burnable points not yet burned at the census time
    pub unburned: usize,
    /// Points that can never burn
    pub unburnable: usize,
}

/// Per-period breakdown of every grid point at the period's end
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodStats {
    /// Period sequence number
    pub period: u32,
    /// Start of the period's window
    pub begins: f64,
    /// End of the period's window
    pub ends: f64,
    /// Points ignited during this period
    pub current: usize,
    /// Points ignited during an earlier period
    pub previous: usize,
    /// Burnable points still unburned when the period ends
    pub unburned: usize,
    /// Points that can never burn
    pub unburnable: usize,
}

#[derive(Default)]
struct RowCensus {
    perimeter: Vec<GeoTimeCoord>,
    open_faces: [usize; 5],
    burned: usize,
    unburned: usize,
    unburnable: usize,
}

/// A point fire growth engine over a geographic grid.
///
/// Each grid point stores a single `FireStatus`. Ignitions and barriers are
/// painted onto the grid before (or between) burning periods; every
/// `advance_period` call then expands the fire by one time window.
pub struct FireStateGrid {
    status: GeoGrid<FireStatus>,
    period: Period,
    cache: IgnitionTemplateCache,
    input: Box<dyn FireInputProvider>,
    burned_points: usize,
    last_perimeter: Vec<GeoTimeCoord>,
}

impl FireStateGrid {
    /// Create an unburned grid over `bounds` with the default template cache
    /// capacity.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::Configuration` for degenerate bounds.
    pub fn new(
        bounds: GeoBounds,
        input: Box<dyn FireInputProvider>,
        behavior: Box<dyn FireBehaviorProvider>,
    ) -> Result<Self, FireGrowthError> {
        Self::with_template_capacity(bounds, input, behavior, DEFAULT_TEMPLATE_CAPACITY)
    }

    /// Create an unburned grid holding at most `template_capacity` cached
    /// ignition templates.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::Configuration` for degenerate bounds or a
    /// zero capacity.
    pub fn with_template_capacity(
        bounds: GeoBounds,
        input: Box<dyn FireInputProvider>,
        behavior: Box<dyn FireBehaviorProvider>,
        template_capacity: usize,
    ) -> Result<Self, FireGrowthError> {
        let cache = IgnitionTemplateCache::new(
            behavior,
            bounds.x_spacing(),
            bounds.y_spacing(),
            template_capacity,
        )?;
        Ok(Self {
            status: GeoGrid::new(bounds, FireStatus::UNBURNED),
            period: Period::new(),
            cache,
            input,
            burned_points: 0,
            last_perimeter: Vec::new(),
        })
    }

    /// The geographic extent of the grid
    pub fn bounds(&self) -> &GeoBounds {
        self.status.bounds()
    }

    /// The current burning period
    pub fn period(&self) -> &Period {
        &self.period
    }

    /// The template cache (for hit and miss accounting)
    pub fn template_cache(&self) -> &IgnitionTemplateCache {
        &self.cache
    }

    /// Running count of points ignited so far, by hand or by fire spread
    pub fn burned_points(&self) -> usize {
        self.burned_points
    }

    /// The perimeter the most recent `advance_period` call expanded from
    /// (empty before the first call and after burnout)
    pub fn last_perimeter(&self) -> &[GeoTimeCoord] {
        &self.last_perimeter
    }

    /// Burn status of the point containing `[x, y]`
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when the coordinate falls
    /// outside the grid.
    pub fn status_at(&self, x: f64, y: f64) -> Result<FireStatus, FireGrowthError> {
        self.status.get(x, y)
    }

    /// TRUE if the point containing `[x, y]` is burned at `at_time`
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when the coordinate falls
    /// outside the grid.
    pub fn is_burned_at(&self, x: f64, y: f64, at_time: f64) -> Result<bool, FireGrowthError> {
        Ok(self.status.get(x, y)?.is_burned_at(at_time))
    }

    /// TRUE if the point containing `[x, y]` is unburned at `at_time`
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when the coordinate falls
    /// outside the grid.
    pub fn is_unburned_at(&self, x: f64, y: f64, at_time: f64) -> Result<bool, FireGrowthError> {
        Ok(self.status.get(x, y)?.is_unburned_at(at_time))
    }

    /// TRUE if the point containing `[x, y]` can never burn
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when the coordinate falls
    /// outside the grid.
    pub fn is_unburnable(&self, x: f64, y: f64) -> Result<bool, FireGrowthError> {
        Ok(self.status.get(x, y)?.is_unburnable())
    }

    /// Ignite the point containing `[x, y]` at `time`.
    ///
    /// Returns TRUE if the point was set, FALSE if it was unburnable or
    /// already burned at or before `time`.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when the coordinate falls
    /// outside the grid.
    pub fn ignite_at(&mut self, x: f64, y: f64, time: f64) -> Result<bool, FireGrowthError> {
        let prior = self.status.get(x, y)?;
        if prior.is_unburned_at(time) {
            self.status.set(x, y, FireStatus::ignited_at(time))?;
            // Re-igniting an already-burned point at an earlier time does
            // not add a burned point
            if prior.ignition_time().is_none() {
                self.burned_points += 1;
            }
            debug!(x, y, time, "point ignited");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Mark each listed point as a barrier of the given kind
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when any point falls outside
    /// the grid; points before the offending one stay painted.
    pub fn set_unburnable_points(
        &mut self,
        points: &[GeoCoord],
        kind: BarrierKind,
    ) -> Result<(), FireGrowthError> {
        for point in points {
            self.status.set(point.x, point.y, FireStatus::barrier(kind))?;
        }
        Ok(())
    }

    /// Mark the point containing `[x, y]` as a barrier of the given kind
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when the coordinate falls
    /// outside the grid.
    pub fn set_unburnable_at(
        &mut self,
        x: f64,
        y: f64,
        kind: BarrierKind,
    ) -> Result<(), FireGrowthError> {
        self.status.set(x, y, FireStatus::barrier(kind))
    }

    /// Mark a horizontal run of points as a barrier
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when either end falls outside
    /// the grid.
    pub fn set_unburnable_row(
        &mut self,
        y: f64,
        from_x: f64,
        thru_x: f64,
        kind: BarrierKind,
    ) -> Result<(), FireGrowthError> {
        self.status.set_row(y, from_x, thru_x, FireStatus::barrier(kind))
    }

    /// Mark a vertical run of points as a barrier
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when either end falls outside
    /// the grid.
    pub fn set_unburnable_col(
        &mut self,
        x: f64,
        from_y: f64,
        thru_y: f64,
        kind: BarrierKind,
    ) -> Result<(), FireGrowthError> {
        self.status.set_col(x, from_y, thru_y, FireStatus::barrier(kind))
    }

    /// Mark a rectangle of points as a barrier (corner order does not
    /// matter)
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::OutOfBounds` when either corner falls
    /// outside the grid.
    pub fn set_unburnable_rect(
        &mut self,
        from_x: f64,
        from_y: f64,
        thru_x: f64,
        thru_y: f64,
        kind: BarrierKind,
    ) -> Result<(), FireGrowthError> {
        self.status
            .set_rect(from_x, from_y, thru_x, thru_y, FireStatus::barrier(kind))
    }

    /// Return every point (barriers included) to the unburned state and
    /// rewind the period to its pre-simulation window
    pub fn reset(&mut self) {
        self.status.fill(FireStatus::UNBURNED);
        self.period = Period::new();
        self.cache.clear();
        self.burned_points = 0;
        self.last_perimeter.clear();
    }

    /// Grow the fire through the next burning period of `duration`.
    ///
    /// The period is advanced first; the census of the perimeter is taken at
    /// the new period's start. Returns FALSE (with the period still
    /// advanced) when no perimeter remains to expand.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::Configuration` for a non-positive duration
    /// and propagates provider and traversal failures.
    pub fn advance_period(&mut self, duration: f64) -> Result<bool, FireGrowthError> {
        self.period.advance(duration)?;
        let begins = self.period.begins();
        let census = self.census_at(begins);
        if census.perimeter.is_empty() {
            self.last_perimeter.clear();
            info!(period = self.period.number(), "no fire perimeter remains");
            return Ok(false);
        }
        let period = self.period;
        let mut ignited = 0usize;
        for point in &census.perimeter {
            let input = self
                .input
                .fire_input(point.x, point.y, begins, period.duration())?;
            let template = self.cache.template_for(&input)?;
            let stats = template.overlay(
                GeoCoord {
                    x: point.x,
                    y: point.y,
                },
                point.time,
                &period,
                &mut self.status,
            )?;
            ignited += stats.ignited + stats.ignited_earlier;
            self.burned_points += stats.ignited;
        }
        info!(
            period = period.number(),
            begins = period.begins(),
            ends = period.ends(),
            perimeter = census.perimeter.len(),
            ignited,
            "burning period complete"
        );
        self.last_perimeter = census.perimeter;
        Ok(true)
    }

    /// Take a census of the fire at `at_time`: totals per burn category, the
    /// open-face histogram of burned points, and the fire perimeter.
    ///
    /// A burned point's open faces are its cardinal neighbors that are
    /// burnable and still unburned at `at_time`; a burned point with at
    /// least one open face is on the perimeter. Rows are censused in
    /// parallel and folded in grid order, so the perimeter ordering is
    /// deterministic.
    pub fn census_at(&self, at_time: f64) -> GridCensus {
        let rows: Vec<RowCensus> = (0..self.status.rows())
            .into_par_iter()
            .map(|row| self.census_row(row, at_time))
            .collect();
        let mut census = GridCensus {
            perimeter: Vec::new(),
            open_faces: [0; 5],
            burned: 0,
            unburned: 0,
            unburnable: 0,
        };
        for row in rows {
            census.perimeter.extend(row.perimeter);
            for (total, faces) in census.open_faces.iter_mut().zip(row.open_faces) {
                *total += faces;
            }
            census.burned += row.burned;
            census.unburned += row.unburned;
            census.unburnable += row.unburnable;
        }
        census
    }

    /// Classify every grid point against the current period's window
    pub fn period_stats(&self) -> PeriodStats {
        let begins = self.period.begins();
        let ends = self.period.ends();
        let mut stats = PeriodStats {
            period: self.period.number(),
            begins,
            ends,
            current: 0,
            previous: 0,
            unburned: 0,
            unburnable: 0,
        };
        for status in self.status.data() {
            if status.is_unburnable() {
                stats.unburnable += 1;
            } else if status.is_unburned_at(ends) {
                stats.unburned += 1;
            } else if status.value() < begins {
                stats.previous += 1;
            } else {
                stats.current += 1;
            }
        }
        stats
    }

    fn census_row(&self, row: usize, at_time: f64) -> RowCensus {
        let mut census = RowCensus::default();
        let bounds = self.status.bounds();
        for col in 0..self.status.cols() {
            let status = self.status.data()[self.status.idx(col, row)];
            if status.is_unburnable() {
                census.unburnable += 1;
                continue;
            }
            if !status.is_burned_at(at_time) {
                census.unburned += 1;
                continue;
            }
            census.burned += 1;
            let (x, y) = self.status.coord_of(col, row);
            let mut faces = 0usize;
            for direction in Direction::ALL {
                let (nx, ny) = match direction {
                    Direction::North => (x, y + bounds.y_spacing()),
                    Direction::East => (x + bounds.x_spacing(), y),
                    Direction::South => (x, y - bounds.y_spacing()),
                    Direction::West => (x - bounds.x_spacing(), y),
                };
                if bounds.inbounds(nx, ny)
                    && self.status.get_unguarded(nx, ny).is_unburned_at(at_time)
                {
                    faces += 1;
                }
            }
            census.open_faces[faces] += 1;
            if faces > 0 {
                // A burned point always has an ignition time
                if let Some(time) = status.ignition_time() {
                    census.perimeter.push(GeoTimeCoord { x, y, time });
                }
            }
        }
        census
    }
}

impl std::fmt::Debug for FireStateGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FireStateGrid")
            .field("bounds", self.status.bounds())
            .field("period", &self.period)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
