//! Core types shared by the R-Tree engine.
//!
//! This module defines:
//! - Error types and result types
//! - Item equality used by deletion
//! - Configuration
//! - Statistics and integrity reports

use thiserror::Error;

use super::rtree_constants::{
    DEFAULT_FILL_FACTOR, DEFAULT_MAX_ENTRIES, MINIMUM_MAX_ENTRIES, MINIMUM_MIN_ENTRIES,
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in spatial indexing operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    #[error("Invalid envelope: ({min_x}, {min_y}, {max_x}, {max_y})")]
    InvalidEnvelope {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    #[error("Invalid segment: {0}")]
    InvalidSegment(String),

    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

// ============================================================================
// Item Equality
// ============================================================================

/// Decides whether two stored items are the same item.
///
/// Deletion removes every stored item that compares equal to the requested one.
/// Any `Fn(&T, &T) -> bool` closure works as a comparer.
pub trait ItemEquality<T> {
    fn equals(&self, a: &T, b: &T) -> bool;
}

/// Comparer backed by `PartialEq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEquality;

impl<T: PartialEq> ItemEquality<T> for DefaultEquality {
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

impl<T, F> ItemEquality<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Node capacity settings for an [`RBush`](crate::RBush).
///
/// `max_entries` is clamped to at least [`MINIMUM_MAX_ENTRIES`] when the
/// config is created or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawConfig"))]
pub struct RBushConfig {
    max_entries: usize,
}

impl RBushConfig {
    /// Creates a config, clamping `max_entries` to at least [`MINIMUM_MAX_ENTRIES`].
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(MINIMUM_MAX_ENTRIES),
        }
    }

    /// Maximum number of children per node.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Minimum number of children a split leaves in each half:
    /// `max(2, ceil(max_entries * 0.4))`.
    pub fn min_entries(&self) -> usize {
        let scaled = (self.max_entries as f64 * DEFAULT_FILL_FACTOR).ceil() as usize;
        scaled.max(MINIMUM_MIN_ENTRIES)
    }
}

impl Default for RBushConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawConfig {
    max_entries: usize,
}

#[cfg(feature = "serde")]
impl From<RawConfig> for RBushConfig {
    fn from(raw: RawConfig) -> Self {
        RBushConfig::new(raw.max_entries)
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Structural statistics about an R-Tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RTreeStats {
    /// Number of stored items
    pub total_entries: usize,
    /// Number of nodes, leaves included
    pub node_count: usize,
    /// Number of leaf nodes
    pub leaf_count: usize,
    /// Height of the root (a lone leaf is 1)
    pub tree_height: usize,
}

/// Result of a structural integrity check
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Total nodes checked
    pub nodes_checked: usize,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}
