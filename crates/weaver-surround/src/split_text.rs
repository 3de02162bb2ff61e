//! Boundary normalization.
//!
//! A selection may start or end in the middle of a text node. Before
//! building, those text nodes are split so that both boundaries fall
//! between nodes, and the range is tracked as a pair of nodes instead of a
//! pair of offsets.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::content::{ContentTree, next_node_outside, previous_node_outside};
use crate::range::{Boundary, DomRange, compare_boundaries};
use crate::view::TreeView;

/// The first and last node touched by a normalized selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitRange<N> {
    start: N,
    end: N,
}

impl<N: Copy + Eq> SplitRange<N> {
    pub fn new(start: N, end: N) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> N {
        self.start
    }

    pub fn end(&self) -> N {
        self.end
    }

    /// Keep the tracked nodes valid when `element` is about to be replaced
    /// by its children. Must be called before the view unwraps `element`.
    pub(crate) fn adjust_range<D>(&mut self, view: &TreeView<'_, D>, element: N)
    where
        D: ContentTree<Node = N> + ?Sized,
    {
        if self.start == element {
            if let Some(next) = view
                .first_child(element)
                .or_else(|| view.next_sibling(element))
            {
                self.start = next;
            }
        }
        if self.end == element {
            if let Some(previous) = view
                .last_child(element)
                .or_else(|| view.previous_sibling(element))
            {
                self.end = previous;
            }
        }
    }

    /// Range from the start of the first node to the end of the last.
    pub fn to_dom_range<D>(&self, tree: &D) -> DomRange<N>
    where
        D: ContentTree<Node = N> + ?Sized,
    {
        let start = Boundary::new(self.start, 0);
        let end = Boundary::new(self.end, tree.length(self.end));
        if compare_boundaries(tree, start, end) == Ordering::Greater {
            return DomRange::from_boundaries(start, start);
        }
        DomRange::from_boundaries(start, end)
    }
}

/// Split the text nodes at the boundaries of `range` and return the nodes
/// the normalized range starts and ends with.
///
/// Only text nodes are split; no node outside `base` is ever touched.
pub fn split_partially_selected<D: ContentTree + ?Sized>(
    tree: &mut D,
    range: &DomRange<D::Node>,
    base: D::Node,
) -> SplitRange<D::Node> {
    let mut end = range.end();
    let start = range.start();

    let node = start.container;
    let start_node = if tree.is_text(node) {
        let len = tree.text_len(node);
        if start.offset > 0 && start.offset < len {
            let tail = tree.split_text(node, start.offset);
            if end.container == node {
                end = Boundary::new(tail, end.offset.saturating_sub(start.offset));
            }
            tail
        } else if start.offset == len && len > 0 {
            next_node_outside(tree, node, base).unwrap_or(node)
        } else {
            node
        }
    } else {
        match tree.child(node, start.offset) {
            Some(child) => child,
            None => next_node_outside(tree, node, base).unwrap_or(node),
        }
    };

    let node = end.container;
    let end_node = if tree.is_text(node) {
        let len = tree.text_len(node);
        if end.offset > 0 && end.offset < len {
            tree.split_text(node, end.offset);
            node
        } else if end.offset == 0 && len > 0 {
            previous_node_outside(tree, node, base).unwrap_or(node)
        } else {
            node
        }
    } else {
        let last = end.offset.checked_sub(1);
        match last.and_then(|i| tree.child(node, i)) {
            Some(child) => child,
            None => previous_node_outside(tree, node, base).unwrap_or(node),
        }
    };

    tracing::trace!(
        target: "weaver::surround",
        start = ?start_node,
        end = ?end_node,
        "normalized range boundaries"
    );

    SplitRange::new(start_node, end_node)
}

/// Membership test for "is this node inside the normalized selection".
///
/// Nodes are numbered in tree order under `base` once, after splitting. A
/// node is inside when it comes at or after the start node and at or before
/// the last descendant of the end node. Unwrapping elements never reorders
/// text, so the numbering stays valid for the whole build.
pub(crate) struct RangeOrder<N> {
    positions: HashMap<N, usize>,
    first: usize,
    last: usize,
}

impl<N: Copy + Eq + std::hash::Hash> RangeOrder<N> {
    pub(crate) fn new<D>(tree: &D, base: N, split: &SplitRange<N>) -> Self
    where
        D: ContentTree<Node = N> + ?Sized,
    {
        let mut positions = HashMap::new();
        let mut last_in_end = 0;
        number(
            tree,
            base,
            split.end(),
            false,
            &mut positions,
            &mut last_in_end,
        );

        let first = positions
            .get(&split.start())
            .copied()
            .unwrap_or(usize::MAX);
        Self {
            positions,
            first,
            last: last_in_end,
        }
    }

    pub(crate) fn contains(&self, node: N) -> bool {
        self.positions
            .get(&node)
            .is_some_and(|&pos| self.first <= pos && pos <= self.last)
    }
}

fn number<D: ContentTree + ?Sized>(
    tree: &D,
    node: D::Node,
    end: D::Node,
    in_end: bool,
    positions: &mut HashMap<D::Node, usize>,
    last_in_end: &mut usize,
) {
    let pos = positions.len();
    positions.insert(node, pos);
    let in_end = in_end || node == end;
    if in_end {
        *last_in_end = pos;
    }
    for child in tree.children(node) {
        number(tree, child, end, in_end, positions, last_in_end);
    }
}
