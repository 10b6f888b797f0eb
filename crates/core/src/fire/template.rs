//! Ignition templates: precomputed wavelet arrival fields
//!
//! A template is the fire ellipse of one set of burning conditions sampled
//! onto a small local grid centered on the ignition point, with the same
//! spacings as the fire state grid. Each template cell holds the distance
//! from the ignition point and the time the wavelet takes to get there.
//! Because arrival times depend only on conditions, spacing, and period
//! duration, one template serves every ignition point burning under the same
//! conditions; templates are therefore immutable and shared via `Arc` by
//! `IgnitionTemplateCache`.
//!
//! `overlay` applies a template to the fire state grid at a specific
//! ignition point: a flood walk out from the ignition point that ignites
//! every reachable point whose arrival falls within the current burning
//! period. The walk carries its own scratch state so concurrent overlays of
//! one shared template never contend.

use rayon::prelude::*;
use serde::Serialize;
use tracing::trace;

use crate::error::FireGrowthError;
use crate::fire::ellipse::{EllipsePoint, FireEllipse};
use crate::fire::period::Period;
use crate::fire::status::FireStatus;
use crate::geo::{GeoBounds, GeoCoord, GeoGrid};

/// One of the four cardinal neighbor directions on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions, in a fixed order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The direction pointing back where a move came from
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Column and row deltas of one step (row 0 is the northern edge, so
    /// north decreases the row)
    fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Counters from one `overlay` walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverlayStats {
    /// Neighbor moves examined
    pub tested: usize,
    /// Points that passed every gate and were classified
    pub traversed: usize,
    /// Unburned points ignited by this walk
    pub ignited: usize,
    /// Already-scheduled points re-ignited at an earlier arrival
    pub ignited_earlier: usize,
    /// Points reached whose existing ignition was already at least as early
    pub crossed: usize,
}

/// The arrival field of one fire ellipse, sampled on a local grid centered
/// on the ignition point.
#[derive(Debug, Clone)]
pub struct IgnitionTemplate {
    grid: GeoGrid<EllipsePoint>,
    ellipse: FireEllipse,
    origin_col: usize,
    origin_row: usize,
}

impl IgnitionTemplate {
    /// Sample `ellipse` onto a local grid with the given spacings.
    ///
    /// The grid extends one full ellipse length (padded by one spacing) in
    /// every direction from the ignition point at the origin, so any heading
    /// fits.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::Configuration` if either spacing is not
    /// positive.
    pub fn build(
        ellipse: &FireEllipse,
        x_spacing: f64,
        y_spacing: f64,
    ) -> Result<Self, FireGrowthError> {
        if x_spacing <= 0.0 || y_spacing <= 0.0 {
            return Err(FireGrowthError::Configuration {
                reason: format!(
                    "template spacings must be positive, got x {} y {}",
                    x_spacing, y_spacing
                ),
            });
        }
        let length = ellipse.length();
        let half_x = x_spacing * ((length / x_spacing).ceil() + 1.0);
        let half_y = y_spacing * ((length / y_spacing).ceil() + 1.0);
        let bounds = GeoBounds::new(-half_x, half_y, half_x, -half_y, x_spacing, y_spacing)?;
        let cols = bounds.cols();
        let field = (0..bounds.cells())
            .into_par_iter()
            .map(|i| {
                let col = i % cols;
                let row = i / cols;
                let x = bounds.west() + col as f64 * x_spacing;
                let y = bounds.north() - row as f64 * y_spacing;
                ellipse.point_at(x, y)
            })
            .collect();
        Ok(Self {
            grid: GeoGrid::from_parts(bounds, field),
            ellipse: *ellipse,
            origin_col: bounds.x_interval(0.0),
            origin_row: bounds.y_interval(0.0),
        })
    }

    /// The local extent of the template, centered on the ignition point
    pub fn bounds(&self) -> &GeoBounds {
        self.grid.bounds()
    }

    /// The ellipse the template was sampled from
    pub fn ellipse(&self) -> &FireEllipse {
        &self.ellipse
    }

    /// Number of template columns
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Number of template rows
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Distance and arrival time at the local offset `(dx, dy)` from the
    /// ignition point (guarded)
    pub fn point(&self, dx: f64, dy: f64) -> Result<EllipsePoint, FireGrowthError> {
        self.grid.get(dx, dy)
    }

    /// Apply the template to `fire` for a wavelet launched from `ignition`
    /// (a point already burning at `ignition_time`) during `period`.
    ///
    /// The walk floods outward from the ignition point one neighbor at a
    /// time. A move into a point proceeds only if the point is unvisited in
    /// this walk, inside the fire grid, scheduled to arrive before the
    /// period ends, burnable, and not already burned in an earlier period.
    /// A point that passes is ignited when unburned, re-ignited when the
    /// walk arrives earlier than its scheduled time, and left alone (but
    /// still walked through) otherwise.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::InvariantViolation` if the walk exceeds its
    /// step budget, which indicates corrupted traversal state.
    pub fn overlay(
        &self,
        ignition: GeoCoord,
        ignition_time: f64,
        period: &Period,
        fire: &mut GeoGrid<FireStatus>,
    ) -> Result<OverlayStats, FireGrowthError> {
        let mut stats = OverlayStats::default();
        let mut visited = vec![false; self.grid.cells()];
        visited[self.grid.idx(self.origin_col, self.origin_row)] = true;

        let mut stack: Vec<(usize, usize, Direction)> = Vec::new();
        for towards in Direction::ALL {
            if let Some((col, row)) = self.step(self.origin_col, self.origin_row, towards) {
                stack.push((col, row, towards));
            }
        }

        // Every point enters the stack at most once per neighbor
        let budget = 4 * self.grid.cells() + 4;
        let mut steps = 0usize;
        while let Some((col, row, towards)) = stack.pop() {
            steps += 1;
            if steps > budget {
                return Err(FireGrowthError::InvariantViolation {
                    reason: format!("ignition overlay exceeded {} traversal steps", budget),
                });
            }
            stats.tested += 1;

            let idx = self.grid.idx(col, row);
            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            let (dx, dy) = self.grid.coord_of(col, row);
            let x = ignition.x + dx;
            let y = ignition.y + dy;
            if !fire.bounds().inbounds(x, y) {
                continue;
            }
            let arrives = ignition_time + self.grid.data()[idx].arrival_time;
            if arrives >= period.ends() {
                continue;
            }
            let status = fire.get_unguarded(x, y);
            if status.is_unburnable() {
                continue;
            }
            if let Some(scheduled) = status.ignition_time() {
                // Burned in an earlier period: the fire has already moved
                // through here, stop
                if scheduled < period.begins() {
                    continue;
                }
                if arrives < scheduled {
                    fire.set_unguarded(x, y, FireStatus::ignited_at(arrives));
                    stats.ignited_earlier += 1;
                } else {
                    stats.crossed += 1;
                }
            } else {
                fire.set_unguarded(x, y, FireStatus::ignited_at(arrives));
                stats.ignited += 1;
            }
            stats.traversed += 1;

            let back = towards.opposite();
            for next in Direction::ALL {
                if next == back {
                    continue;
                }
                if let Some((ncol, nrow)) = self.step(col, row, next) {
                    if !visited[self.grid.idx(ncol, nrow)] {
                        stack.push((ncol, nrow, next));
                    }
                }
            }
        }
        trace!(
            x = ignition.x,
            y = ignition.y,
            tested = stats.tested,
            ignited = stats.ignited,
            ignited_earlier = stats.ignited_earlier,
            crossed = stats.crossed,
            "overlay walk complete"
        );
        Ok(stats)
    }

    /// Neighbor of `[col, row]` one step `towards`, if it stays inside the
    /// template
    fn step(&self, col: usize, row: usize, towards: Direction) -> Option<(usize, usize)> {
        let (dc, dr) = towards.delta();
        let ncol = col.checked_add_signed(dc)?;
        let nrow = row.checked_add_signed(dr)?;
        (ncol < self.grid.cols() && nrow < self.grid.rows()).then_some((ncol, nrow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Rates of the classic length 100, width 50 test ellipse over unit time
    const HEAD: f64 = 93.30127018922192;
    const BACK: f64 = 6.698729810778069;
    const FLANK: f64 = 12.499999999999996;

    fn ellipse() -> FireEllipse {
        FireEllipse::new(HEAD, 2.0, 0.0, 1.0).unwrap()
    }

    fn template() -> IgnitionTemplate {
        IgnitionTemplate::build(&ellipse(), 10.0, 10.0).unwrap()
    }

    fn fire_grid() -> GeoGrid<FireStatus> {
        let bounds = GeoBounds::new(1000.0, 5000.0, 2000.0, 4000.0, 10.0, 10.0).unwrap();
        GeoGrid::new(bounds, FireStatus::UNBURNED)
    }

    fn period(begins: f64, ends: f64) -> Period {
        let mut p = Period::new();
        if begins > 0.0 {
            p.advance(begins).unwrap();
        }
        p.advance(ends - begins).unwrap();
        p
    }

    const ORIGIN: GeoCoord = GeoCoord {
        x: 1500.0,
        y: 4500.0,
    };

    #[test]
    fn test_template_sizing() {
        let t = template();
        // Length 100, spacing 10: 11 spacings of reach on each side
        assert_eq!(t.cols(), 23);
        assert_eq!(t.rows(), 23);
        assert_eq!(t.bounds().west(), -110.0);
        assert_eq!(t.bounds().north(), 110.0);
    }

    #[test]
    fn test_template_samples_the_ellipse() {
        let t = template();
        let north = t.point(0.0, 10.0).unwrap();
        assert_relative_eq!(north.distance, 10.0, epsilon = 1e-12);
        assert_relative_eq!(north.arrival_time, 10.0 / HEAD, epsilon = 1e-12);
        let south = t.point(0.0, -10.0).unwrap();
        assert_relative_eq!(south.arrival_time, 10.0 / BACK, epsilon = 1e-9);
        let origin = t.point(0.0, 0.0).unwrap();
        assert_eq!(origin.arrival_time, 0.0);
    }

    #[test]
    fn test_overlay_ignites_points_arriving_within_the_period() {
        let t = template();
        let mut fire = fire_grid();
        fire.set(ORIGIN.x, ORIGIN.y, FireStatus::ignited_at(0.0))
            .unwrap();
        let stats = t
            .overlay(ORIGIN, 0.0, &period(0.0, 1.0), &mut fire)
            .unwrap();
        assert!(stats.ignited > 0);
        assert_eq!(stats.ignited_earlier, 0);

        // Head reaches 90 north within the period, not 100
        let t90 = fire.get(1500.0, 4590.0).unwrap().ignition_time().unwrap();
        assert_relative_eq!(t90, 90.0 / HEAD, epsilon = 1e-9);
        assert!(fire.get(1500.0, 4600.0).unwrap().ignition_time().is_none());
        // Flanks reach one spacing, the back none
        let east = fire.get(1510.0, 4500.0).unwrap().ignition_time().unwrap();
        assert_relative_eq!(east, 10.0 / FLANK, epsilon = 1e-9);
        assert!(fire.get(1520.0, 4500.0).unwrap().ignition_time().is_none());
        assert!(fire.get(1500.0, 4490.0).unwrap().ignition_time().is_none());
        // The ignition point itself is untouched
        assert_eq!(
            fire.get(ORIGIN.x, ORIGIN.y).unwrap().ignition_time(),
            Some(0.0)
        );
    }

    #[test]
    fn test_overlay_short_period_exact_counts() {
        let t = template();
        let mut fire = fire_grid();
        fire.set(ORIGIN.x, ORIGIN.y, FireStatus::ignited_at(0.0))
            .unwrap();
        // Only the point one spacing toward the head arrives before 0.2
        let stats = t
            .overlay(ORIGIN, 0.0, &period(0.0, 0.2), &mut fire)
            .unwrap();
        assert_eq!(stats.ignited, 1);
        assert_eq!(stats.traversed, 1);
        assert_eq!(stats.tested, 7);
        assert!(fire.get(1500.0, 4510.0).unwrap().ignition_time().is_some());
    }

    #[test]
    fn test_overlay_reignites_earlier_arrivals() {
        let t = template();
        let mut fire = fire_grid();
        fire.set(ORIGIN.x, ORIGIN.y, FireStatus::ignited_at(0.0))
            .unwrap();
        fire.set(1500.0, 4510.0, FireStatus::ignited_at(0.9)).unwrap();
        let stats = t
            .overlay(ORIGIN, 0.0, &period(0.0, 1.0), &mut fire)
            .unwrap();
        assert!(stats.ignited_earlier >= 1);
        let rescheduled = fire.get(1500.0, 4510.0).unwrap().ignition_time().unwrap();
        assert_relative_eq!(rescheduled, 10.0 / HEAD, epsilon = 1e-9);
    }

    #[test]
    fn test_overlay_crosses_already_earlier_points() {
        let t = template();
        let mut fire = fire_grid();
        fire.set(ORIGIN.x, ORIGIN.y, FireStatus::ignited_at(0.0))
            .unwrap();
        // Scheduled within the current period, earlier than the walk arrives
        fire.set(1500.0, 4510.0, FireStatus::ignited_at(0.05))
            .unwrap();
        let stats = t
            .overlay(ORIGIN, 0.0, &period(0.0, 1.0), &mut fire)
            .unwrap();
        assert!(stats.crossed >= 1);
        assert_eq!(
            fire.get(1500.0, 4510.0).unwrap().ignition_time(),
            Some(0.05)
        );
    }

    #[test]
    fn test_overlay_routes_around_barriers() {
        use crate::fire::status::BarrierKind;
        let t = template();
        let mut fire = fire_grid();
        fire.set(ORIGIN.x, ORIGIN.y, FireStatus::ignited_at(0.0))
            .unwrap();
        fire.set(1500.0, 4510.0, FireStatus::barrier(BarrierKind::Rock))
            .unwrap();
        t.overlay(ORIGIN, 0.0, &period(0.0, 1.0), &mut fire)
            .unwrap();
        // The barrier holds
        assert!(fire.get(1500.0, 4510.0).unwrap().is_unburnable());
        // Points beyond it are reached through the flanks, at the template's
        // straight-line arrival
        let beyond = fire.get(1500.0, 4520.0).unwrap().ignition_time().unwrap();
        assert_relative_eq!(beyond, 20.0 / HEAD, epsilon = 1e-9);
    }

    #[test]
    fn test_overlay_stops_at_earlier_period_burns() {
        let t = template();
        let mut fire = fire_grid();
        // A wall burned during an earlier period seals off the north
        fire.set_row(4510.0, 1000.0, 2000.0, FireStatus::ignited_at(0.5))
            .unwrap();
        fire.set(ORIGIN.x, ORIGIN.y, FireStatus::ignited_at(1.0))
            .unwrap();
        let stats = t
            .overlay(ORIGIN, 1.0, &period(1.0, 2.0), &mut fire)
            .unwrap();
        assert_eq!(stats.crossed, 0);
        assert_eq!(
            fire.get(1500.0, 4510.0).unwrap().ignition_time(),
            Some(0.5)
        );
        assert!(fire.get(1500.0, 4520.0).unwrap().ignition_time().is_none());
        // The flanks still burn
        assert!(fire.get(1510.0, 4500.0).unwrap().ignition_time().is_some());
    }

    #[test]
    fn test_overlay_clips_to_the_fire_grid() {
        let t = template();
        let mut fire = fire_grid();
        let corner = GeoCoord {
            x: 1000.0,
            y: 5000.0,
        };
        fire.set(corner.x, corner.y, FireStatus::ignited_at(0.0))
            .unwrap();
        let stats = t
            .overlay(corner, 0.0, &period(0.0, 1.0), &mut fire)
            .unwrap();
        // Everything north and west of the corner is off-grid; the walk
        // still ignites in-grid points
        assert!(stats.ignited > 0);
        assert!(fire.get(1010.0, 5000.0).unwrap().ignition_time().is_some());
    }

    #[test]
    fn test_direction_opposites() {
        for d in Direction::ALL {
            assert_ne!(d, d.opposite());
            assert_eq!(d, d.opposite().opposite());
        }
    }
}
