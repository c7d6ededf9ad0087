//! Constants for the in-memory R-Tree.

/// Default maximum number of children per node
pub const DEFAULT_MAX_ENTRIES: usize = 9;

/// Smallest accepted maximum; lower values are clamped up to it
pub const MINIMUM_MAX_ENTRIES: usize = 4;

/// Lower bound for the minimum number of children after a split
pub const MINIMUM_MIN_ENTRIES: usize = 2;

/// Minimum fill of a split node, as a fraction of the maximum (40%)
pub const DEFAULT_FILL_FACTOR: f64 = 0.4;
