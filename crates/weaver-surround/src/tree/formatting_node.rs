use std::rc::Rc;

use super::{ElementNode, TreeNode};
use crate::flat_range::FlatRange;
use crate::match_type::Match;

/// The unit of formatting: a span of siblings that gets wrapped, unwrapped
/// or reformatted as a whole.
#[derive(Clone, Debug)]
pub struct FormattingNode<N, T> {
    range: FlatRange<N>,
    inside_range: bool,
    /// Matches above this node, outermost first.
    match_ancestors: Vec<Rc<Match<N, T>>>,
    /// Matches below this node that cover its text.
    match_leaves: Vec<Rc<Match<N, T>>>,
    has_match_holes: bool,
    /// Elements this node ascended above, in tree order.
    extensions: Vec<N>,
    children: Vec<TreeNode<N, T>>,
}

impl<N: Copy + Eq, T> FormattingNode<N, T> {
    pub(crate) fn new(
        range: FlatRange<N>,
        inside_range: bool,
        match_ancestors: Vec<Rc<Match<N, T>>>,
    ) -> Self {
        Self {
            range,
            inside_range,
            match_ancestors,
            match_leaves: Vec::new(),
            has_match_holes: true,
            extensions: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Combine two adjacent nodes. The result keeps the children, leaves and
    /// holes of both and the ancestors of `before`, but no extensions.
    pub(crate) fn merge(before: Self, after: Self) -> Self {
        let mut children = before.children;
        children.extend(after.children);
        let mut match_leaves = before.match_leaves;
        match_leaves.extend(after.match_leaves);

        Self {
            range: FlatRange::merge(&before.range, &after.range),
            inside_range: before.inside_range && after.inside_range,
            match_ancestors: before.match_ancestors,
            match_leaves,
            has_match_holes: before.has_match_holes || after.has_match_holes,
            extensions: Vec::new(),
            children,
        }
    }

    /// Move this node above `element`, which sits at `index` of `parent` and
    /// has this node as its only child. The element keeps this node's former
    /// children.
    pub(crate) fn ascend_above(&mut self, element: N, parent: N, index: usize) {
        self.range.select(parent, index);
        self.extensions.insert(0, element);

        let children = std::mem::take(&mut self.children);
        if !children.is_empty() {
            self.children = vec![TreeNode::Element(ElementNode::new(element, children))];
        }
    }

    /// Record `leaf` as covering this node if nothing below did already.
    pub(crate) fn cover_holes(&mut self, leaf: &Rc<Match<N, T>>) {
        if self.has_match_holes {
            self.match_leaves.push(Rc::clone(leaf));
            self.has_match_holes = false;
        }
    }

    pub(crate) fn range_mut(&mut self) -> &mut FlatRange<N> {
        &mut self.range
    }

    /// The cache to use when formatting this node.
    ///
    /// Inside the selection that is `inside_value`. Outside it, the node is
    /// covered by some match, and the cache of the first leaf or else the
    /// closest ancestor is returned.
    pub fn cache<'a>(&'a self, inside_value: &'a T) -> Option<&'a T> {
        if self.inside_range {
            Some(inside_value)
        } else if let Some(leaf) = self.first_leaf() {
            leaf.cache()
        } else {
            self.closest_ancestor().and_then(|ancestor| ancestor.cache())
        }
    }
}

impl<N, T> FormattingNode<N, T> {
    pub fn range(&self) -> &FlatRange<N> {
        &self.range
    }

    pub fn inside_range(&self) -> bool {
        self.inside_range
    }

    pub fn match_ancestors(&self) -> &[Rc<Match<N, T>>] {
        &self.match_ancestors
    }

    pub fn match_leaves(&self) -> &[Rc<Match<N, T>>] {
        &self.match_leaves
    }

    pub fn first_leaf(&self) -> Option<&Match<N, T>> {
        self.match_leaves.first().map(Rc::as_ref)
    }

    pub fn closest_ancestor(&self) -> Option<&Match<N, T>> {
        self.match_ancestors.last().map(Rc::as_ref)
    }

    /// Whether some text under this node is covered by no leaf.
    pub fn has_match_holes(&self) -> bool {
        self.has_match_holes
    }

    /// Whether any existing match affects this node's text.
    pub fn has_match(&self) -> bool {
        !self.match_leaves.is_empty() || !self.match_ancestors.is_empty()
    }

    pub fn extensions(&self) -> &[N] {
        &self.extensions
    }

    pub fn children(&self) -> &[TreeNode<N, T>] {
        &self.children
    }
}
