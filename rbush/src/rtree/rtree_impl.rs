use std::slice;

use crate::envelope::Envelope;
use crate::SpatialData;

use super::node::{Entry, Node};
use super::rtree_types::{
    DefaultEquality, IntegrityReport, ItemEquality, RBushConfig, RTreeStats, SpatialError,
    SpatialResult,
};

/// An in-memory R-Tree over items that expose an [`Envelope`].
///
/// Items are inserted one at a time with [`insert`](RBush::insert) or in
/// batches with [`bulk_load`](RBush::bulk_load), and found again by bounding
/// box or by proximity (see [`knn`](RBush::knn)). Deletion matches items with
/// the comparer `C`, which defaults to `PartialEq`.
///
/// # Examples
///
/// ```rust
/// use rbush::{Envelope, RBush};
///
/// let mut tree = RBush::new();
/// tree.insert(Envelope::new(0.0, 0.0, 1.0, 1.0));
/// tree.insert(Envelope::new(5.0, 5.0, 6.0, 6.0));
///
/// let hits = tree.search_envelope(&Envelope::new(0.5, 0.5, 2.0, 2.0));
/// assert_eq!(hits, vec![&Envelope::new(0.0, 0.0, 1.0, 1.0)]);
///
/// assert!(tree.delete(&Envelope::new(5.0, 5.0, 6.0, 6.0)));
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RBush<T, C = DefaultEquality> {
    pub(crate) root: Node<T>,
    pub(crate) count: usize,
    pub(crate) config: RBushConfig,
    pub(crate) comparer: C,
}

impl<T: SpatialData> RBush<T> {
    /// Creates an empty tree with the default node capacity.
    pub fn new() -> Self {
        Self::with_config(RBushConfig::default())
    }

    /// Creates an empty tree holding at most `max_entries` children per node.
    ///
    /// Values below 4 are clamped to 4.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self::with_config(RBushConfig::new(max_entries))
    }

    /// Creates an empty tree from a config.
    pub fn with_config(config: RBushConfig) -> Self {
        Self::with_config_and_comparer(config, DefaultEquality)
    }
}

impl<T: SpatialData> Default for RBush<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SpatialData, C> RBush<T, C> {
    /// Creates an empty tree that matches items on deletion with `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self::with_config_and_comparer(RBushConfig::default(), comparer)
    }

    /// Creates an empty tree with both a config and a comparer.
    pub fn with_config_and_comparer(config: RBushConfig, comparer: C) -> Self {
        Self {
            root: Node::new_leaf(),
            count: 0,
            config,
            comparer,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Alias of [`len`](RBush::len).
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Height of the tree; an empty or single-leaf tree has height 1.
    pub fn height(&self) -> usize {
        self.root.height
    }

    /// Bounding box of everything stored, [`Envelope::EMPTY`] for an empty tree.
    pub fn envelope(&self) -> Envelope {
        self.root.envelope
    }

    pub fn root(&self) -> &Node<T> {
        &self.root
    }

    pub fn config(&self) -> RBushConfig {
        self.config
    }

    pub fn max_entries(&self) -> usize {
        self.config.max_entries()
    }

    pub fn min_entries(&self) -> usize {
        self.config.min_entries()
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Adds an item to the tree.
    pub fn insert(&mut self, item: T) {
        if self.insert_entry(Entry::Item(item), 1) {
            self.count += 1;
        }
    }

    /// Inserts `entry` into a node of height `level`, splitting upward as needed.
    ///
    /// Items go to level 1. A subtree of height `h` goes to level `h + 1`.
    /// Returns `false` if no node of that height could be reached.
    pub(crate) fn insert_entry(&mut self, entry: Entry<T>, level: usize) -> bool {
        let path = self.choose_subtree(&entry.envelope(), level);
        match node_at_mut(&mut self.root, &path) {
            Some(target) => {
                debug_assert_eq!(target.height, level, "descent stopped above its level");
                target.push(entry);
            }
            None => {
                debug_assert!(false, "descent path {:?} does not lead to a node", path);
                return false;
            }
        }
        self.adjust_path(&path);
        true
    }

    /// Descends from the root to a node of height `level`, at each step picking
    /// the child needing the least enlargement (ties: smallest area).
    fn choose_subtree(&self, envelope: &Envelope, level: usize) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.root.height);
        let mut node = &self.root;

        while node.height > level {
            let mut best: Option<(usize, &Node<T>)> = None;
            let mut best_enlargement = f64::INFINITY;
            let mut best_area = f64::INFINITY;

            for (i, child) in node.children.iter().enumerate() {
                if let Entry::Node(child) = child {
                    let enlargement = child.envelope.enlargement(envelope);
                    let area = child.envelope.area();

                    if best.is_none()
                        || enlargement < best_enlargement
                        || (enlargement == best_enlargement && area < best_area)
                    {
                        best_enlargement = enlargement;
                        best_area = area;
                        best = Some((i, &**child));
                    }
                }
            }

            match best {
                Some((index, child)) => {
                    path.push(index);
                    node = child;
                }
                None => {
                    // only an empty internal node has no child to descend into
                    debug_assert!(false, "internal node at height {} is empty", node.height);
                    break;
                }
            }
        }

        path
    }

    /// Walks the path bottom-up, splitting overflowing nodes and refreshing envelopes.
    fn adjust_path(&mut self, path: &[usize]) {
        let max_entries = self.max_entries();
        let min_entries = self.min_entries();

        for depth in (0..=path.len()).rev() {
            let Some(node) = node_at_mut(&mut self.root, &path[..depth]) else {
                continue;
            };

            if node.children.len() > max_entries {
                let sibling = node.split(max_entries, min_entries);
                log::trace!(
                    "Split node at height {} into {} + {} children",
                    sibling.height,
                    node.children.len(),
                    sibling.children.len()
                );

                if depth == 0 {
                    self.split_root(sibling);
                } else if let Some(parent) = node_at_mut(&mut self.root, &path[..depth - 1]) {
                    parent.push(Entry::Node(Box::new(sibling)));
                }
            } else {
                node.reset_envelope();
            }
        }
    }

    /// Grows the tree by one level with children `[old root, sibling]`.
    pub(crate) fn split_root(&mut self, sibling: Node<T>) {
        let height = self.root.height + 1;
        let old_root = std::mem::replace(&mut self.root, Node::new_leaf());
        self.root = Node::with_children(
            vec![Entry::Node(Box::new(old_root)), Entry::Node(Box::new(sibling))],
            height,
        );
        log::trace!("Grew root to height {}", height);
    }

    /// Removes all items and resets the root to an empty leaf.
    pub fn clear(&mut self) {
        log::debug!("Clearing tree with {} item(s)", self.count);
        self.root = Node::new_leaf();
        self.count = 0;
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Returns every stored item.
    pub fn search(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// Returns every item whose envelope intersects `envelope` (touching counts).
    pub fn search_envelope(&self, envelope: &Envelope) -> Vec<&T> {
        let mut results = Vec::new();
        if !self.root.envelope.intersects(envelope) {
            return results;
        }

        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            for child in &node.children {
                match child {
                    Entry::Item(item) => {
                        if item.envelope().intersects(envelope) {
                            results.push(item);
                        }
                    }
                    Entry::Node(child) => {
                        if envelope.contains(&child.envelope) {
                            results.extend(Iter::new(child));
                        } else if child.envelope.intersects(envelope) {
                            stack.push(child);
                        }
                    }
                }
            }
        }

        results
    }

    /// Returns every item whose envelope lies inside `envelope`.
    pub fn search_contained(&self, envelope: &Envelope) -> Vec<&T> {
        let mut results = Vec::new();
        if !self.root.envelope.intersects(envelope) {
            return results;
        }

        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            for child in &node.children {
                match child {
                    Entry::Item(item) => {
                        if envelope.contains(&item.envelope()) {
                            results.push(item);
                        }
                    }
                    Entry::Node(child) => {
                        if envelope.contains(&child.envelope) {
                            results.extend(Iter::new(child));
                        } else if child.envelope.intersects(envelope) {
                            stack.push(child);
                        }
                    }
                }
            }
        }

        results
    }

    /// Checks whether any stored item intersects `envelope`.
    pub fn collides(&self, envelope: &Envelope) -> bool {
        if !self.root.envelope.intersects(envelope) {
            return false;
        }

        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            for child in &node.children {
                match child {
                    Entry::Item(item) => {
                        if item.envelope().intersects(envelope) {
                            return true;
                        }
                    }
                    Entry::Node(child) => {
                        if envelope.contains(&child.envelope) && !child.children.is_empty() {
                            return true;
                        }
                        if child.envelope.intersects(envelope) {
                            stack.push(child);
                        }
                    }
                }
            }
        }

        false
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Collects structural statistics by walking every node.
    pub fn stats(&self) -> RTreeStats {
        let mut stats = RTreeStats {
            total_entries: self.count,
            tree_height: self.root.height,
            ..RTreeStats::default()
        };

        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            stats.node_count += 1;
            if node.is_leaf() {
                stats.leaf_count += 1;
            }
            for child in &node.children {
                if let Entry::Node(child) = child {
                    stack.push(child);
                }
            }
        }

        stats
    }

    /// Verifies the structural invariants of every node.
    ///
    /// Checked: cached envelopes equal the union of their children, leaves
    /// hold only items and internal nodes only non-empty nodes one level
    /// lower, no node exceeds the maximum fan-out, and the item count matches.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::new();
        let max_entries = self.max_entries();
        let mut items = 0;

        let mut stack: Vec<(&Node<T>, Vec<usize>)> = vec![(&self.root, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            report.nodes_checked += 1;

            let expected = Envelope::enclosing(node.children.iter().map(Entry::envelope));
            if expected != node.envelope {
                report.record(format!(
                    "Node {:?} caches {} but its children span {}",
                    path, node.envelope, expected
                ));
            }

            if node.children.len() > max_entries {
                report.record(format!(
                    "Node {:?} holds {} children, more than {}",
                    path,
                    node.children.len(),
                    max_entries
                ));
            }

            if !path.is_empty() && node.children.is_empty() {
                report.record(format!("Node {:?} is empty", path));
            }

            for (i, child) in node.children.iter().enumerate() {
                match child {
                    Entry::Item(_) if node.is_leaf() => items += 1,
                    Entry::Item(_) => {
                        report.record(format!("Internal node {:?} holds an item at {}", path, i));
                    }
                    Entry::Node(_) if node.is_leaf() => {
                        report.record(format!("Leaf {:?} holds a node at {}", path, i));
                    }
                    Entry::Node(child) => {
                        if child.height + 1 != node.height {
                            report.record(format!(
                                "Node {:?} at height {} has a child of height {}",
                                path, node.height, child.height
                            ));
                        }
                        let mut child_path = path.clone();
                        child_path.push(i);
                        stack.push((&**child, child_path));
                    }
                }
            }
        }

        if items != self.count {
            report.record(format!(
                "Tree reports {} items but {} are stored",
                self.count, items
            ));
        }

        report
    }

    /// Runs [`check_integrity`](RBush::check_integrity) and fails on the first violation.
    pub fn validate(&self) -> SpatialResult<()> {
        let report = self.check_integrity();
        match report.errors.into_iter().next() {
            Some(error) => Err(SpatialError::IntegrityViolation(error)),
            None => Ok(()),
        }
    }
}

impl<T: SpatialData, C: ItemEquality<T>> RBush<T, C> {
    // ========================================================================
    // Deletion
    // ========================================================================

    /// Removes every stored item equal to `item` according to the comparer.
    ///
    /// Returns `false` when nothing matched. Nodes left empty are pruned and
    /// envelopes along the affected paths are recomputed; sparse nodes are
    /// never merged.
    pub fn delete(&mut self, item: &T) -> bool {
        let mut leaf_paths = self.find_leaf_paths(item);
        if leaf_paths.is_empty() {
            return false;
        }

        // descending order keeps the indices of unprocessed paths valid
        leaf_paths.sort_unstable_by(|a, b| b.cmp(a));

        let mut removed = 0;
        for path in &leaf_paths {
            let comparer = &self.comparer;
            if let Some(leaf) = node_at_mut(&mut self.root, path) {
                let before = leaf.children.len();
                leaf.children.retain(|entry| match entry {
                    Entry::Item(stored) => !comparer.equals(stored, item),
                    Entry::Node(_) => true,
                });
                removed += before - leaf.children.len();
            }
            self.condense_path(path);
        }

        self.count -= removed;
        self.shrink_root();
        log::trace!("Deleted {} item(s), {} remaining", removed, self.count);

        removed > 0
    }

    // Paths of all leaves holding a match, reached through nodes whose
    // envelope contains the item's envelope.
    fn find_leaf_paths(&self, item: &T) -> Vec<Vec<usize>> {
        let envelope = item.envelope();
        let mut found = Vec::new();
        let mut stack: Vec<(&Node<T>, Vec<usize>)> = vec![(&self.root, Vec::new())];

        while let Some((node, path)) = stack.pop() {
            if !node.envelope.contains(&envelope) {
                continue;
            }

            if node.is_leaf() {
                let has_match = node.children.iter().any(|entry| match entry {
                    Entry::Item(stored) => self.comparer.equals(stored, item),
                    Entry::Node(_) => false,
                });
                if has_match {
                    found.push(path);
                }
                continue;
            }

            for (i, child) in node.children.iter().enumerate() {
                if let Entry::Node(child) = child {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    stack.push((&**child, child_path));
                }
            }
        }

        found
    }

    // Recomputes envelopes from the leaf at `path` up to the root, dropping
    // child nodes that became empty.
    fn condense_path(&mut self, path: &[usize]) {
        if let Some(leaf) = node_at_mut(&mut self.root, path) {
            leaf.reset_envelope();
        }

        for depth in (0..path.len()).rev() {
            let Some(parent) = node_at_mut(&mut self.root, &path[..depth]) else {
                continue;
            };

            let index = path[depth];
            let child_is_empty = matches!(
                parent.children.get(index),
                Some(Entry::Node(child)) if child.children.is_empty()
            );
            if child_is_empty {
                parent.children.remove(index);
            }
            parent.reset_envelope();
        }
    }

    // An empty root goes back to being a leaf; an internal root with a single
    // child is replaced by that child.
    fn shrink_root(&mut self) {
        if self.root.children.is_empty() {
            self.root = Node::new_leaf();
            return;
        }

        while !self.root.is_leaf() && self.root.children.len() == 1 {
            match self.root.children.pop() {
                Some(Entry::Node(child)) => {
                    self.root = *child;
                    log::trace!("Shrunk root to height {}", self.root.height);
                }
                Some(entry) => {
                    self.root.children.push(entry);
                    break;
                }
                None => break,
            }
        }
    }
}

impl<T, C> RBush<T, C> {
    /// Iterates over all stored items in storage order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }
}

/// Follows `path` (child indices) from `node` down through internal nodes.
pub(crate) fn node_at_mut<'a, T>(node: &'a mut Node<T>, path: &[usize]) -> Option<&'a mut Node<T>> {
    let mut node = node;
    for &index in path {
        node = match node.children.get_mut(index)? {
            Entry::Node(child) => &mut **child,
            Entry::Item(_) => return None,
        };
    }
    Some(node)
}

// ============================================================================
// Iteration
// ============================================================================

/// Depth-first iterator over the items of a tree.
pub struct Iter<'a, T> {
    stack: Vec<slice::Iter<'a, Entry<T>>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Node<T>) -> Self {
        Self {
            stack: vec![root.children.iter()],
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Entry::Item(item)) => return Some(item),
                Some(Entry::Node(node)) => self.stack.push(node.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

impl<'a, T, C> IntoIterator for &'a RBush<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
