use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// An undirected connection between two grid points.
///
/// `state` is stamped by the evaluator after every pass and is never read
/// back as a source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    start: Point,
    end: Point,
    pub state: bool,
}

impl Wire {
    /// Returns `None` for a degenerate wire (both ends on one point).
    pub fn new(start: Point, end: Point) -> Option<Self> {
        if start == end {
            return None;
        }
        Some(Wire {
            start,
            end,
            state: false,
        })
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Whether `point` lies within `tolerance` of the wire's segment.
    pub fn is_near(&self, point: Point, tolerance: f64) -> bool {
        point.distance_to_segment(self.start, self.end) < tolerance
    }
}

/// Flat serialized form of a wire, shared by saved circuits and chip
/// definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSpec {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl WireSpec {
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

impl From<&Wire> for WireSpec {
    fn from(wire: &Wire) -> Self {
        WireSpec {
            x1: wire.start.x,
            y1: wire.start.y,
            x2: wire.end.x,
            y2: wire.end.y,
        }
    }
}
