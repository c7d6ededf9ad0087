use std::fmt;

use crate::{SpatialError, SpatialResult};
use crate::geometry::{self, Point, Segment};

/// A 2D axis-aligned bounding box represented by minimum and maximum coordinates.
///
/// `Envelope` is the only shape the tree understands. Every stored item exposes
/// one through [`SpatialData`](crate::SpatialData), and every node caches the
/// union of its children's envelopes.
///
/// Two distinguished values exist: [`Envelope::EMPTY`] (the identity for
/// [`union`](Envelope::union)) and [`Envelope::INFINITE`] (contains everything).
///
/// # Examples
///
/// ```rust
/// use rbush::Envelope;
///
/// let a = Envelope::new(0.0, 0.0, 10.0, 10.0);
/// let b = Envelope::new(5.0, 5.0, 15.0, 15.0);
///
/// assert!(a.intersects(&b));
/// assert_eq!(a.union(&b), Envelope::new(0.0, 0.0, 15.0, 15.0));
/// assert_eq!(a.intersection(&b).area(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope::EMPTY
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Envelope({}, {}, {}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl Envelope {
    /// The empty envelope. Union with it leaves the other operand unchanged.
    pub const EMPTY: Envelope = Envelope {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    /// The envelope covering the whole plane.
    pub const INFINITE: Envelope = Envelope {
        min_x: f64::NEG_INFINITY,
        min_y: f64::NEG_INFINITY,
        max_x: f64::INFINITY,
        max_y: f64::INFINITY,
    };

    /// Creates a new envelope with the specified coordinates.
    ///
    /// No validation is performed; see [`Envelope::try_new`].
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Envelope {
        Envelope {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a new envelope, rejecting NaN coordinates and inverted bounds.
    pub fn try_new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> SpatialResult<Envelope> {
        let envelope = Envelope::new(min_x, min_y, max_x, max_y);
        let has_nan = [min_x, min_y, max_x, max_y].iter().any(|c| c.is_nan());
        if has_nan || !envelope.is_valid() {
            return Err(SpatialError::InvalidEnvelope {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(envelope)
    }

    /// Creates a degenerate envelope covering a single point.
    pub const fn from_point(x: f64, y: f64) -> Envelope {
        Envelope::new(x, y, x, y)
    }

    /// Computes the envelope enclosing every envelope yielded by `envelopes`.
    ///
    /// An empty input yields [`Envelope::EMPTY`].
    pub(crate) fn enclosing<I>(envelopes: I) -> Envelope
    where
        I: IntoIterator<Item = Envelope>,
    {
        envelopes
            .into_iter()
            .fold(Envelope::EMPTY, |acc, e| acc.union(&e))
    }

    /// Returns the width of the envelope, never negative.
    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(0.0)
    }

    /// Returns the height of the envelope, never negative.
    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(0.0)
    }

    /// Returns the area of the envelope. Invalid envelopes have zero area.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the half-perimeter of the envelope.
    pub fn margin(&self) -> f64 {
        self.width() + self.height()
    }

    /// Returns the center point of the envelope.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the union of this envelope with another.
    pub fn union(&self, other: &Envelope) -> Envelope {
        Envelope::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grows this envelope in place to include `other`.
    pub fn extend(&mut self, other: &Envelope) {
        *self = self.union(other);
    }

    /// Returns the componentwise intersection of the two envelopes.
    ///
    /// Disjoint envelopes yield an inverted box whose [`area`](Envelope::area) is zero.
    pub fn intersection(&self, other: &Envelope) -> Envelope {
        Envelope::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        )
    }

    /// Returns how much the area grows when `other` is merged into this envelope.
    pub fn enlargement(&self, other: &Envelope) -> f64 {
        self.union(other).area() - self.area()
    }

    /// Checks if this envelope fully encloses another (boundaries included).
    pub fn contains(&self, other: &Envelope) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    /// Checks if this envelope contains a point (boundaries included).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Checks if this envelope intersects another. Touching counts.
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && self.min_y <= other.max_y
            && self.max_x >= other.min_x
            && self.max_y >= other.min_y
    }

    /// Checks if the envelope is degenerate to a single point.
    pub fn is_point(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y
    }

    /// Checks if this envelope has min <= max on both axes.
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Checks if this envelope covers nothing, like [`Envelope::EMPTY`].
    pub fn is_empty(&self) -> bool {
        !self.is_valid()
    }

    /// Squared Euclidean distance from the nearest point of the envelope to `(x, y)`.
    ///
    /// Zero when the point lies inside or on the boundary.
    pub fn squared_distance_to_point(&self, x: f64, y: f64) -> f64 {
        let dx = axis_distance(x, self.min_x, self.max_x);
        let dy = axis_distance(y, self.min_y, self.max_y);
        dx * dx + dy * dy
    }

    /// Euclidean distance from the nearest point of the envelope to `(x, y)`.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        self.squared_distance_to_point(x, y).sqrt()
    }

    /// Squared Euclidean distance between the envelope and a line segment.
    ///
    /// A point-like envelope uses the plain point-to-segment distance. Otherwise
    /// the distance is zero when an endpoint lies in the box or the segment
    /// crosses one of the box edges, and the closest edge/segment pair wins
    /// when they are apart.
    pub fn squared_distance_to_segment(&self, start: Point, end: Point) -> f64 {
        if self.is_point() {
            return geometry::squared_distance_to_segment(
                Point::new(self.min_x, self.min_y),
                start,
                end,
            );
        }

        if self.contains_point(start.x, start.y) || self.contains_point(end.x, end.y) {
            return 0.0;
        }

        let segment = Segment::new(start, end);
        let edges = self.edges();
        let crosses = edges
            .iter()
            .filter(|edge| !edge.is_degenerate())
            .any(|edge| segment.intersects(edge));
        if crosses {
            return 0.0;
        }

        let mut min_distance = f64::MAX;
        for edge in edges.iter().filter(|edge| !edge.is_degenerate()) {
            let candidates = [
                geometry::squared_distance_to_segment(edge.start, start, end),
                geometry::squared_distance_to_segment(edge.end, start, end),
                geometry::squared_distance_to_segment(start, edge.start, edge.end),
                geometry::squared_distance_to_segment(end, edge.start, edge.end),
            ];
            for distance in candidates {
                if distance < min_distance {
                    min_distance = distance;
                }
            }
        }
        min_distance
    }

    /// The four box edges, walking (min,min) -> (min,max) -> (max,max) -> (max,min).
    fn edges(&self) -> [Segment; 4] {
        let corners = [
            Point::new(self.min_x, self.min_y),
            Point::new(self.min_x, self.max_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.max_x, self.min_y),
        ];
        [
            Segment::new(corners[0], corners[1]),
            Segment::new(corners[1], corners[2]),
            Segment::new(corners[2], corners[3]),
            Segment::new(corners[3], corners[0]),
        ]
    }
}

fn axis_distance(k: f64, min: f64, max: f64) -> f64 {
    if k < min {
        min - k
    } else if k > max {
        k - max
    } else {
        0.0
    }
}
