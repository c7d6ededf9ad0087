//! K-nearest-neighbor search over an [`RBush`].
//!
//! The search is a single best-first traversal: a min-heap holds both
//! unexplored nodes and candidate items keyed by their squared distance to
//! the target. An item reaching the top of the heap is closer than anything
//! still unexplored, so items are emitted in ascending distance order and the
//! search stops as soon as `k` of them have been collected.
//!
//! ## Example
//!
//! ```rust
//! use rbush::{Envelope, Point, RBush};
//!
//! let mut tree = RBush::new();
//! tree.insert(Envelope::new(0.0, 0.0, 1.0, 1.0));
//! tree.insert(Envelope::new(10.0, 10.0, 11.0, 11.0));
//! tree.insert(Envelope::new(4.0, 4.0, 5.0, 5.0));
//!
//! let nearest = tree.knn(2, Point::new(0.0, 0.0));
//! assert_eq!(nearest[0], &Envelope::new(0.0, 0.0, 1.0, 1.0));
//! assert_eq!(nearest[1], &Envelope::new(4.0, 4.0, 5.0, 5.0));
//!
//! let within = tree
//!     .knn_query(Point::new(0.0, 0.0))
//!     .max_distance(6.0)
//!     .execute_with_distance();
//! assert_eq!(within.len(), 2);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::envelope::Envelope;
use crate::geometry::{Point, Segment};
use crate::rtree::{Entry, Node, RBush};
use crate::SpatialData;

/// What a nearest-neighbor query measures distances to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnnTarget {
    Point(Point),
    Segment(Segment),
}

impl KnnTarget {
    /// Squared distance from the target to the nearest point of `envelope`.
    pub fn squared_distance_to(&self, envelope: &Envelope) -> f64 {
        match self {
            KnnTarget::Point(point) => envelope.squared_distance_to_point(point.x, point.y),
            KnnTarget::Segment(segment) => {
                envelope.squared_distance_to_segment(segment.start, segment.end)
            }
        }
    }
}

impl From<Point> for KnnTarget {
    fn from(point: Point) -> Self {
        KnnTarget::Point(point)
    }
}

impl From<(f64, f64)> for KnnTarget {
    fn from(coords: (f64, f64)) -> Self {
        KnnTarget::Point(coords.into())
    }
}

impl From<Segment> for KnnTarget {
    fn from(segment: Segment) -> Self {
        KnnTarget::Segment(segment)
    }
}

// ============================================================================
// Priority queue
// ============================================================================

enum Candidate<'a, T> {
    Node(&'a Node<T>),
    Item(&'a T),
}

struct QueueEntry<'a, T> {
    distance: f64,
    candidate: Candidate<'a, T>,
}

impl<T> QueueEntry<'_, T> {
    fn is_item(&self) -> bool {
        matches!(self.candidate, Candidate::Item(_))
    }
}

impl<T> PartialEq for QueueEntry<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for QueueEntry<'_, T> {}

impl<T> PartialOrd for QueueEntry<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for QueueEntry<'_, T> {
    // BinaryHeap is a max-heap: the nearest entry must compare greatest, and
    // at equal distance an item outranks a node.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.is_item().cmp(&other.is_item()))
    }
}

/// Best-first search returning `(item, squared distance)` pairs in ascending order.
///
/// `k == 0` means unbounded.
fn nearest<'a, T: SpatialData>(
    root: &'a Node<T>,
    target: &KnnTarget,
    k: usize,
    max_distance: Option<f64>,
    filter: Option<&dyn Fn(&T) -> bool>,
) -> Vec<(&'a T, f64)> {
    let max_squared = max_distance.map(|d| d * d);
    let mut results = Vec::new();
    let mut queue = BinaryHeap::new();
    let mut node = Some(root);

    while let Some(current) = node {
        for child in &current.children {
            let distance = target.squared_distance_to(&child.envelope());
            if max_squared.is_some_and(|max| distance > max) {
                continue;
            }
            let candidate = match child {
                Entry::Item(item) => Candidate::Item(item),
                Entry::Node(child) => Candidate::Node(&**child),
            };
            queue.push(QueueEntry {
                distance,
                candidate,
            });
        }

        while queue.peek().is_some_and(QueueEntry::is_item) {
            if let Some(QueueEntry {
                distance,
                candidate: Candidate::Item(item),
            }) = queue.pop()
            {
                if filter.map_or(true, |accept| accept(item)) {
                    results.push((item, distance));
                }
                if k > 0 && results.len() == k {
                    return results;
                }
            }
        }

        node = match queue.pop() {
            Some(QueueEntry {
                candidate: Candidate::Node(next),
                ..
            }) => Some(next),
            _ => None,
        };
    }

    results
}

// ============================================================================
// Fluent query
// ============================================================================

/// A nearest-neighbor query under construction.
///
/// Created by [`RBush::knn_query`]. Without further settings the query returns
/// every item ordered by distance.
pub struct KnnQuery<'a, T, C> {
    tree: &'a RBush<T, C>,
    target: KnnTarget,
    k: usize,
    max_distance: Option<f64>,
    filter: Option<Box<dyn Fn(&T) -> bool + 'a>>,
}

impl<'a, T: SpatialData, C> KnnQuery<'a, T, C> {
    /// Caps the number of results; `0` means no cap.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Ignores items farther than `distance` from the target.
    pub fn max_distance(mut self, distance: f64) -> Self {
        self.max_distance = Some(distance);
        self
    }

    /// Keeps only items accepted by `predicate`.
    ///
    /// Rejected items do not count towards `k`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Runs the query, returning items nearest first.
    pub fn execute(self) -> Vec<&'a T> {
        self.run().into_iter().map(|(item, _)| item).collect()
    }

    /// Runs the query, returning items with their Euclidean distance.
    pub fn execute_with_distance(self) -> Vec<(&'a T, f64)> {
        self.run()
            .into_iter()
            .map(|(item, squared)| (item, squared.sqrt()))
            .collect()
    }

    fn run(&self) -> Vec<(&'a T, f64)> {
        nearest(
            &self.tree.root,
            &self.target,
            self.k,
            self.max_distance,
            self.filter.as_deref(),
        )
    }
}

impl<T: SpatialData, C> RBush<T, C> {
    /// Returns up to `k` items nearest to `target`, nearest first.
    ///
    /// `k == 0` returns every item. Asking for more items than stored is fine.
    pub fn knn(&self, k: usize, target: impl Into<KnnTarget>) -> Vec<&T> {
        self.knn_query(target).k(k).execute()
    }

    /// Like [`knn`](RBush::knn), pairing each item with its distance to `target`.
    pub fn knn_with_distance(&self, k: usize, target: impl Into<KnnTarget>) -> Vec<(&T, f64)> {
        self.knn_query(target).k(k).execute_with_distance()
    }

    /// Starts a nearest-neighbor query with optional limit, radius and filter.
    pub fn knn_query(&self, target: impl Into<KnnTarget>) -> KnnQuery<'_, T, C> {
        KnnQuery {
            tree: self,
            target: target.into(),
            k: 0,
            max_distance: None,
            filter: None,
        }
    }
}
