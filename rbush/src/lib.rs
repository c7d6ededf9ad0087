//! # RBush - 2D Spatial Indexing
//!
//! This crate provides an in-memory R-Tree for two-dimensional axis-aligned
//! bounding boxes, with bounding-box search and incremental k-nearest-neighbor
//! queries against points or line segments.
//!
//! ## Features
//!
//! - **Dynamic**: Items can be inserted and deleted at any time
//! - **Bulk Loading**: Sort-tile-recursive packing for large batches, merged into existing data
//! - **Range Search**: Intersecting and contained queries pruned by node envelopes
//! - **KNN Search**: Best-first nearest neighbors with limit, radius and predicate
//! - **Segment Targets**: Distances measured to a line segment instead of a point
//! - **Custom Equality**: Deletion matches items with a pluggable comparer
//!
//! ## Quick Start
//!
//! ```rust
//! use rbush::{Envelope, Point, RBush};
//!
//! let mut tree = RBush::with_max_entries(16);
//! tree.bulk_load((0..100).map(|i| {
//!     let v = i as f64;
//!     Envelope::new(v, v, v + 1.0, v + 1.0)
//! }));
//!
//! // Find intersecting entries
//! let hits = tree.search_envelope(&Envelope::new(10.5, 10.5, 12.5, 12.5));
//! assert_eq!(hits.len(), 3);
//!
//! // Find the nearest entries to a point
//! let nearest = tree.knn(2, Point::new(50.5, 50.5));
//! assert_eq!(nearest[0], &Envelope::new(50.0, 50.0, 51.0, 51.0));
//! ```

pub mod envelope;
pub mod geometry;
pub mod knn;
pub mod rtree;
pub mod spatial_index;

// Re-export R-Tree types
pub use envelope::Envelope;
pub use rtree::{
    DefaultEquality, Entry, IntegrityReport, ItemEquality, Iter, Node, RBush, RBushConfig,
    RTreeStats, SpatialError, SpatialResult,
};

// Re-export geometry types
pub use geometry::{Point, Segment};

// Re-export query types
pub use knn::{KnnQuery, KnnTarget};
pub use spatial_index::{SpatialDatabase, SpatialIndex};

/// Anything that can be stored in the tree: it only has to report its bounding box.
pub trait SpatialData {
    fn envelope(&self) -> Envelope;
}

impl SpatialData for Envelope {
    fn envelope(&self) -> Envelope {
        *self
    }
}

impl<T: SpatialData + ?Sized> SpatialData for &T {
    fn envelope(&self) -> Envelope {
        (**self).envelope()
    }
}

impl<T: SpatialData + ?Sized> SpatialData for Box<T> {
    fn envelope(&self) -> Envelope {
        (**self).envelope()
    }
}
