//! Trait definitions for spatial indexes.
//!
//! [`RBush`] implements both traits, so code that only needs to query or
//! maintain an index can stay generic over the implementation.

use crate::envelope::Envelope;
use crate::rtree::{ItemEquality, RBush};
use crate::SpatialData;

/// Read access to a spatial index.
pub trait SpatialIndex<T> {
    /// Returns every stored item.
    fn search(&self) -> Vec<&T>;

    /// Returns the items whose envelope intersects `envelope`.
    fn search_envelope(&self, envelope: &Envelope) -> Vec<&T>;
}

/// A spatial index that can be modified.
pub trait SpatialDatabase<T>: SpatialIndex<T> {
    /// Adds an item to the index.
    fn insert(&mut self, item: T);

    /// Removes an item from the index, returning whether anything was removed.
    fn delete(&mut self, item: &T) -> bool;

    /// Removes all items from the index.
    fn clear(&mut self);

    /// Adds a batch of items.
    fn bulk_load(&mut self, items: Vec<T>);
}

impl<T: SpatialData, C> SpatialIndex<T> for RBush<T, C> {
    fn search(&self) -> Vec<&T> {
        RBush::search(self)
    }

    fn search_envelope(&self, envelope: &Envelope) -> Vec<&T> {
        RBush::search_envelope(self, envelope)
    }
}

impl<T: SpatialData, C: ItemEquality<T>> SpatialDatabase<T> for RBush<T, C> {
    fn insert(&mut self, item: T) {
        RBush::insert(self, item)
    }

    fn delete(&mut self, item: &T) -> bool {
        RBush::delete(self, item)
    }

    fn clear(&mut self) {
        RBush::clear(self)
    }

    fn bulk_load(&mut self, items: Vec<T>) {
        RBush::bulk_load(self, items)
    }
}
