//! Sort-tile-recursive bulk loading.
//!
//! A batch is packed into a fresh, fully balanced subtree and then merged
//! into whatever the tree already holds.

use crate::SpatialData;

use super::node::{sort_by_min_x, sort_by_min_y, Entry, Node};
use super::rtree_impl::RBush;

impl<T: SpatialData, C> RBush<T, C> {
    /// Adds a batch of items, packing them into a balanced subtree first.
    ///
    /// Much faster than repeated [`insert`](RBush::insert) for large batches,
    /// and usually yields better query performance. Small batches, and batches
    /// that fit into a root leaf, fall back to single inserts.
    pub fn bulk_load<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return;
        }

        let fits_in_root = self.root.is_leaf()
            && self.root.children.len() + items.len() <= self.max_entries();
        if fits_in_root || items.len() < self.min_entries() {
            for item in items {
                self.insert(item);
            }
            return;
        }

        let batch_size = items.len();
        let data_root = self.build_tree(items);
        log::debug!(
            "Packed {} item(s) into a subtree of height {}",
            batch_size,
            data_root.height
        );

        if self.merge_subtree(data_root) {
            self.count += batch_size;
        }
    }

    fn build_tree(&self, items: Vec<T>) -> Node<T> {
        let max_entries = self.max_entries();
        let height = packed_height(items.len(), max_entries);
        let root_max_entries = items.len().div_ceil(max_entries.pow(height as u32 - 1));

        let entries = items.into_iter().map(Entry::Item).collect();
        build_nodes(entries, height, root_max_entries, max_entries)
    }

    fn merge_subtree(&mut self, mut data_root: Node<T>) -> bool {
        let max_entries = self.max_entries();

        if self.root.children.is_empty() {
            self.root = data_root;
            return true;
        }

        if self.root.height == data_root.height {
            let combined = self.root.children.len() + data_root.children.len();
            for child in data_root.children {
                self.root.push(child);
            }
            if combined > max_entries {
                let sibling = self.root.split(max_entries, self.min_entries());
                self.split_root(sibling);
            }
            log::debug!(
                "Merged equal-height subtree, root now at height {}",
                self.root.height
            );
            return true;
        }

        if self.root.height < data_root.height {
            std::mem::swap(&mut self.root, &mut data_root);
        }

        let level = data_root.height + 1;
        log::debug!(
            "Inserting subtree of height {} into tree of height {}",
            data_root.height,
            self.root.height
        );
        self.insert_entry(Entry::Node(Box::new(data_root)), level)
    }
}

impl<T: SpatialData> FromIterator<T> for RBush<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RBush::new();
        tree.bulk_load(iter);
        tree
    }
}

impl<T: SpatialData, C> Extend<T> for RBush<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.bulk_load(iter);
    }
}

// Smallest h >= 1 with max_entries^h >= count.
fn packed_height(count: usize, max_entries: usize) -> usize {
    let mut height = 1;
    let mut capacity = max_entries;
    while capacity < count {
        capacity = capacity.saturating_mul(max_entries);
        height += 1;
    }
    height
}

fn build_nodes<T: SpatialData>(
    mut entries: Vec<Entry<T>>,
    height: usize,
    level_max: usize,
    max_entries: usize,
) -> Node<T> {
    if entries.len() <= level_max {
        if height == 1 {
            return Node::with_children(entries, 1);
        }
        let child = build_nodes(entries, height - 1, max_entries, max_entries);
        return Node::with_children(vec![Entry::Node(Box::new(child))], height);
    }

    sort_by_min_x(&mut entries);

    let node_size = entries.len().div_ceil(level_max);
    let column_size = node_size * ceil_sqrt(level_max);

    let mut children = Vec::with_capacity(level_max);
    let mut remaining = entries.into_iter();
    loop {
        let mut column: Vec<Entry<T>> = remaining.by_ref().take(column_size).collect();
        if column.is_empty() {
            break;
        }
        sort_by_min_y(&mut column);

        let mut column = column.into_iter();
        loop {
            let group: Vec<Entry<T>> = column.by_ref().take(node_size).collect();
            if group.is_empty() {
                break;
            }
            let child = build_nodes(group, height - 1, max_entries, max_entries);
            children.push(Entry::Node(Box::new(child)));
        }
    }

    Node::with_children(children, height)
}

fn ceil_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root < n {
        root += 1;
    }
    root
}
