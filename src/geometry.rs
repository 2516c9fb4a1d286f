//! Integer grid coordinates.
//!
//! Connectivity is coordinate equality, so every position that takes part in
//! evaluation is an integer [`Point`]. Floating-point input (from a pointer
//! layer or a saved file) is snapped once, here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Size of one grid cell in coordinate units.
pub const GRID_SIZE: i64 = 20;

/// Half a grid cell. Pin offsets are whole multiples of this.
pub const HALF_CELL: i64 = GRID_SIZE / 2;

/// Largest coordinate magnitude accepted from saved data. Pin offsets are
/// added to positions in integer arithmetic, so positions stay far from the
/// `i64` limits.
pub const MAX_COORDINATE: i64 = 1_000_000_000;

/// An absolute (or relative) position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Point { x, y }
    }

    /// Snap a floating-point position to the nearest integer coordinate.
    pub fn snapped(x: f64, y: f64) -> Self {
        Point {
            x: x.round() as i64,
            y: y.round() as i64,
        }
    }

    /// Whether both coordinates lie within [`MAX_COORDINATE`].
    pub fn in_bounds(self) -> bool {
        let limit = MAX_COORDINATE.unsigned_abs();
        self.x.unsigned_abs() <= limit && self.y.unsigned_abs() <= limit
    }

    /// Offset measured in half cells, e.g. `half_cells(-3, 1)` is 1.5 cells
    /// left and half a cell down.
    pub const fn half_cells(dx: i64, dy: i64) -> Self {
        Point {
            x: dx * HALF_CELL,
            y: dy * HALF_CELL,
        }
    }

    /// Euclidean distance from `self` to the segment `a`–`b`.
    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let (px, py) = (self.x as f64, self.y as f64);
        let (ax, ay) = (a.x as f64, a.y as f64);
        let (bx, by) = (b.x as f64, b.y as f64);
        let (dx, dy) = (bx - ax, by - ay);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
        }
        let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
        let (cx, cy) = (ax + t * dx, ay + t * dy);
        ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_rounds_to_nearest() {
        assert_eq!(Point::snapped(39.6, 100.4), Point::new(40, 100));
        assert_eq!(Point::snapped(-10.5, 0.49), Point::new(-11, 0));
    }

    #[test]
    fn bounds_are_symmetric() {
        assert!(Point::new(MAX_COORDINATE, -MAX_COORDINATE).in_bounds());
        assert!(!Point::new(0, MAX_COORDINATE + 1).in_bounds());
        assert!(!Point::new(i64::MIN, 0).in_bounds());
    }

    #[test]
    fn half_cells_scale_by_grid() {
        assert_eq!(Point::half_cells(-3, 1), Point::new(-30, 10));
        assert_eq!(Point::new(100, 100) + Point::half_cells(3, 0), Point::new(130, 100));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point::new(0, 0);
        let b = Point::new(100, 0);
        assert_eq!(Point::new(50, 5).distance_to_segment(a, b), 5.0);
        assert_eq!(Point::new(-30, 40).distance_to_segment(a, b), 50.0);
    }
}
