//! Point and segment primitives used by nearest-neighbor queries.
//!
//! These types are deliberately tiny: the tree itself only ever reasons about
//! [`Envelope`](crate::Envelope)s, and the geometry here exists to measure the
//! distance between a query target and a box.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::envelope::Envelope;
use crate::{SpatialError, SpatialResult};
use crate::SpatialData;

/// A 2D point (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    pub fn squared_distance(&self, other: &Point) -> f64 {
        let d = self.sub(other);
        d.dot(&d)
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        self.squared_distance(other).sqrt()
    }

    fn sub(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    fn scale(&self, s: f64) -> Point {
        Point::new(self.x * s, self.y * s)
    }

    fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl SpatialData for Point {
    fn envelope(&self) -> Envelope {
        Envelope::from_point(self.x, self.y)
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    /// Creates a new segment without validation.
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Creates a new segment, rejecting NaN coordinates.
    pub fn try_new(start: Point, end: Point) -> SpatialResult<Self> {
        let coords = [start.x, start.y, end.x, end.y];
        if coords.iter().any(|c| c.is_nan()) {
            return Err(SpatialError::InvalidSegment(format!("{} - {}", start, end)));
        }
        Ok(Self::new(start, end))
    }

    /// Checks if both endpoints coincide.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Squared distance from `point` to the closest point of this segment.
    pub fn squared_distance_to_point(&self, point: Point) -> f64 {
        squared_distance_to_segment(point, self.start, self.end)
    }

    /// Checks if two segments cross, using the signs of 2D cross products.
    ///
    /// When both endpoints of either segment are collinear with the other one
    /// the pair is reported as not intersecting. A single endpoint lying on the
    /// other segment still counts as a crossing.
    pub fn intersects(&self, other: &Segment) -> bool {
        let (p1, p2, p3, p4) = (self.start, self.end, other.start, other.end);

        let p3_side = sign(is_left(p1, p2, p3));
        let p4_side = sign(is_left(p1, p2, p4));
        let p1_side = sign(is_left(p3, p4, p1));
        let p2_side = sign(is_left(p3, p4, p2));

        if (p3_side == Ordering::Equal && p4_side == Ordering::Equal)
            || (p1_side == Ordering::Equal && p2_side == Ordering::Equal)
        {
            return false;
        }

        p3_side != p4_side && p1_side != p2_side
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

impl SpatialData for Segment {
    fn envelope(&self) -> Envelope {
        Envelope::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }
}

/// Squared distance from `p` to the segment `seg_start`-`seg_end`.
///
/// The projection parameter is clamped to the segment with two dot-product
/// comparisons instead of a division whenever possible.
pub fn squared_distance_to_segment(p: Point, seg_start: Point, seg_end: Point) -> f64 {
    let v = seg_end.sub(&seg_start);
    let w = p.sub(&seg_start);

    let c1 = w.dot(&v);
    if c1 <= 0.0 {
        return p.squared_distance(&seg_start);
    }

    let c2 = v.dot(&v);
    if c2 <= c1 {
        return p.squared_distance(&seg_end);
    }

    let projected = seg_start.add(&v.scale(c1 / c2));
    p.squared_distance(&projected)
}

// > 0 when p2 is left of the line p0 -> p1, < 0 when right, 0 when collinear
fn is_left(p0: Point, p1: Point, p2: Point) -> f64 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
}

fn sign(value: f64) -> Ordering {
    value.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
}
