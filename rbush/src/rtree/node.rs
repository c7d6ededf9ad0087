//! Tree nodes and the node-splitting heuristic.

use std::cmp::Ordering;

use crate::envelope::Envelope;
use crate::SpatialData;

/// A child slot of a [`Node`]: either a stored item or a nested node.
///
/// Leaves hold only `Item`s, internal nodes hold only `Node`s.
#[derive(Debug, Clone)]
pub enum Entry<T> {
    Item(T),
    Node(Box<Node<T>>),
}

impl<T: SpatialData> SpatialData for Entry<T> {
    /// Envelope of the item, or the cached envelope of the nested node.
    fn envelope(&self) -> Envelope {
        match self {
            Entry::Item(item) => item.envelope(),
            Entry::Node(node) => node.envelope,
        }
    }
}

/// A node of the R-Tree.
///
/// The cached envelope is always the union of the children's envelopes, and
/// `height` counts levels from the leaves (a leaf has height 1).
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub(crate) children: Vec<Entry<T>>,
    pub(crate) height: usize,
    pub(crate) envelope: Envelope,
}

impl<T> Node<T> {
    /// Creates an empty leaf.
    pub(crate) fn new_leaf() -> Self {
        Self {
            children: Vec::new(),
            height: 1,
            envelope: Envelope::EMPTY,
        }
    }

    /// Child entries in storage order.
    pub fn children(&self) -> &[Entry<T>] {
        &self.children
    }

    /// Height counted from the leaves, a leaf being 1.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Union of all child envelopes, [`Envelope::EMPTY`] when the node is empty.
    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    pub fn is_leaf(&self) -> bool {
        self.height == 1
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<T: SpatialData> Node<T> {
    /// Builds a node over `children` at the given height with a fresh envelope.
    pub(crate) fn with_children(children: Vec<Entry<T>>, height: usize) -> Self {
        let mut node = Self {
            children,
            height,
            envelope: Envelope::EMPTY,
        };
        node.reset_envelope();
        node
    }

    /// Recomputes the cached envelope from the children.
    pub(crate) fn reset_envelope(&mut self) {
        self.envelope = Envelope::enclosing(self.children.iter().map(Entry::envelope));
    }

    /// Appends a child and grows the envelope to cover it.
    pub(crate) fn push(&mut self, entry: Entry<T>) {
        self.envelope.extend(&entry.envelope());
        self.children.push(entry);
    }

    /// Splits this node in place, returning the new sibling of the same height.
    ///
    /// The split position `i` is restricted to `lo..=hi` where
    /// `lo = max(min, count - max)` and `hi = min(count - min, max)`, so both
    /// halves end up holding between `min` and `max` children.
    pub(crate) fn split(&mut self, max_entries: usize, min_entries: usize) -> Node<T> {
        let count = self.children.len();
        let lo = min_entries.max(count.saturating_sub(max_entries));
        let hi = count.saturating_sub(min_entries).min(max_entries);

        self.choose_split_axis(lo, hi);
        let index = self.choose_split_index(lo, hi);

        let tail = self.children.split_off(index);
        self.reset_envelope();
        Node::with_children(tail, self.height)
    }

    // Leaves the children sorted along the axis with the smaller margin sum.
    fn choose_split_axis(&mut self, lo: usize, hi: usize) {
        sort_by_min_x(&mut self.children);
        let x_margin = self.split_margin_sum(lo, hi);

        sort_by_min_y(&mut self.children);
        let y_margin = self.split_margin_sum(lo, hi);

        if x_margin < y_margin {
            sort_by_min_x(&mut self.children);
        }
    }

    // Sum of margins of every prefix group [0, i) and suffix group [i, count)
    // over the valid split positions.
    fn split_margin_sum(&self, lo: usize, hi: usize) -> f64 {
        let envelopes: Vec<Envelope> = self.children.iter().map(Entry::envelope).collect();
        let count = envelopes.len();

        let mut prefixes = vec![Envelope::EMPTY; count + 1];
        for i in 0..count {
            prefixes[i + 1] = prefixes[i].union(&envelopes[i]);
        }
        let mut suffixes = vec![Envelope::EMPTY; count + 1];
        for i in (0..count).rev() {
            suffixes[i] = suffixes[i + 1].union(&envelopes[i]);
        }

        (lo..=hi)
            .map(|i| prefixes[i].margin() + suffixes[i].margin())
            .sum()
    }

    // First position minimizing (overlap, total area).
    fn choose_split_index(&self, lo: usize, hi: usize) -> usize {
        let envelopes: Vec<Envelope> = self.children.iter().map(Entry::envelope).collect();

        let mut best_index = lo;
        let mut best_overlap = f64::INFINITY;
        let mut best_area = f64::INFINITY;

        for i in lo..=hi {
            let left = Envelope::enclosing(envelopes[..i].iter().copied());
            let right = Envelope::enclosing(envelopes[i..].iter().copied());

            let overlap = left.intersection(&right).area();
            let area = left.area() + right.area();

            if overlap < best_overlap || (overlap == best_overlap && area < best_area) {
                best_overlap = overlap;
                best_area = area;
                best_index = i;
            }
        }

        best_index
    }
}

pub(crate) fn sort_by_min_x<E: SpatialData>(entries: &mut [E]) {
    entries.sort_by(|a, b| {
        a.envelope()
            .min_x
            .partial_cmp(&b.envelope().min_x)
            .unwrap_or(Ordering::Equal)
    });
}

pub(crate) fn sort_by_min_y<E: SpatialData>(entries: &mut [E]) {
    entries.sort_by(|a, b| {
        a.envelope()
            .min_y
            .partial_cmp(&b.envelope().min_y)
            .unwrap_or(Ordering::Equal)
    });
}
