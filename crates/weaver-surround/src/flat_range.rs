//! Contiguous runs of sibling nodes.

use crate::content::ContentTree;

/// A half-open run `start_index..end_index` of the children of `parent`.
///
/// Indices address the *current* children of `parent`. Any mutation of
/// `parent`'s child list that is not mirrored here leaves the range stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatRange<N> {
    parent: N,
    start_index: usize,
    end_index: usize,
}

impl<N: Copy + Eq> FlatRange<N> {
    pub fn new(parent: N, start_index: usize, end_index: usize) -> Self {
        debug_assert!(start_index <= end_index);
        Self {
            parent,
            start_index,
            end_index,
        }
    }

    /// Range covering the single child at `index`.
    pub fn at(parent: N, index: usize) -> Self {
        Self::new(parent, index, index + 1)
    }

    /// Range covering `node` in its current parent.
    pub fn from_node<D: ContentTree<Node = N> + ?Sized>(tree: &D, node: N) -> Option<Self> {
        Some(Self::at(tree.parent(node)?, tree.index_in_parent(node)?))
    }

    /// Range spanning from the start of `before` to the end of `after`.
    ///
    /// Both ranges must share a parent, with `before` preceding `after`.
    pub fn merge(before: &Self, after: &Self) -> Self {
        debug_assert!(before.parent == after.parent);
        Self::new(before.parent, before.start_index, after.end_index)
    }

    /// Re-point the range at the single child `index` of `parent`.
    pub fn select(&mut self, parent: N, index: usize) {
        *self = Self::at(parent, index);
    }

    /// Move a range addressed inside `element` to `element`'s parent, after
    /// `element` has been replaced by its own children at `offset`.
    pub fn rebase_if_parent(&mut self, element: N, parent: N, offset: usize) {
        if self.parent == element {
            self.parent = parent;
            self.start_index += offset;
            self.end_index += offset;
        }
    }

    pub fn parent(&self) -> N {
        self.parent
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn end_index(&self) -> usize {
        self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    pub fn nodes<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D) -> Vec<N> {
        (self.start_index..self.end_index)
            .filter_map(|index| tree.child(self.parent, index))
            .collect()
    }

    pub fn first_node<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D) -> Option<N> {
        if self.is_empty() {
            return None;
        }
        tree.child(self.parent, self.start_index)
    }

    pub fn last_node<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D) -> Option<N> {
        if self.is_empty() {
            return None;
        }
        tree.child(self.parent, self.end_index - 1)
    }

    /// Concatenated serialization of the covered children.
    pub fn serialize<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D) -> String {
        self.nodes(tree)
            .into_iter()
            .map(|node| tree.serialize(node))
            .collect()
    }
}
