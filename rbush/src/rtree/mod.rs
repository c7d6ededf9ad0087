//! In-memory R-Tree engine.
//!
//! This module provides the tree itself together with its building blocks:
//! - Node model and the split heuristic
//! - Path-based insertion and deletion
//! - Sort-tile-recursive bulk loading
//! - Statistics and integrity checks

pub mod rtree_constants;
pub mod rtree_types;
mod bulk_load;
mod node;
mod rtree_impl;

pub use node::{Entry, Node};
pub use rtree_constants::{
    DEFAULT_FILL_FACTOR, DEFAULT_MAX_ENTRIES, MINIMUM_MAX_ENTRIES, MINIMUM_MIN_ENTRIES,
};
pub use rtree_impl::{Iter, RBush};
pub use rtree_types::{
    DefaultEquality, IntegrityReport, ItemEquality, RBushConfig, RTreeStats, SpatialError,
    SpatialResult,
};
