//! Build phase: content subtree to formatting forest.
//!
//! The walk classifies every element with the format's matcher, plans the
//! removal of matched wrappers, and turns text into formatting nodes. It
//! reads the tree through a `TreeView` and never mutates it; everything that
//! has to change later is recorded in the returned `Plan`.

mod extend;
mod format;
mod merge;

use std::rc::Rc;

pub use format::BuildFormat;

use crate::content::{ContentTree, NodeType};
use crate::error::{CallbackKind, Result, SurroundError};
use crate::flat_range::FlatRange;
use crate::format::SurroundFormat;
use crate::match_type::{ClearFn, Match, MatchKind, MatchType};
use crate::split_text::{RangeOrder, SplitRange};
use crate::tree::{BlockNode, ElementNode, FormattingNode, TreeNode};
use crate::view::TreeView;

type Ancestors<N, T> = [Rc<Match<N, T>>];

/// Mutations decided during the build, in the order they must run.
pub(crate) struct Plan<D: ContentTree> {
    /// Elements to replace by their children, innermost first.
    pub(crate) removals: Vec<D::Node>,
    pub(crate) clears: Vec<(D::Node, ClearFn<D>)>,
}

impl<D: ContentTree> Plan<D> {
    fn new() -> Self {
        Self {
            removals: Vec::new(),
            clears: Vec::new(),
        }
    }
}

/// Result of the build phase.
pub(crate) struct Built<D: ContentTree, T> {
    pub(crate) forest: Vec<TreeNode<D::Node, T>>,
    pub(crate) plan: Plan<D>,
    pub(crate) split: SplitRange<D::Node>,
}

pub(crate) struct Builder<'a, D: ContentTree, T> {
    policy: BuildFormat,
    format: &'a SurroundFormat<D, T>,
    base: D::Node,
    view: TreeView<'a, D>,
    split: SplitRange<D::Node>,
    order: RangeOrder<D::Node>,
    plan: Plan<D>,
}

impl<'a, D: ContentTree, T> Builder<'a, D, T> {
    pub(crate) fn new(
        tree: &'a D,
        format: &'a SurroundFormat<D, T>,
        policy: BuildFormat,
        base: D::Node,
        split: SplitRange<D::Node>,
    ) -> Self {
        Self {
            policy,
            format,
            base,
            view: TreeView::new(tree),
            order: RangeOrder::new(tree, base, &split),
            split,
            plan: Plan::new(),
        }
    }

    /// Build the forest for `target`, an element inside `base` or `base`
    /// itself.
    pub(crate) fn run(mut self, target: D::Node) -> Result<Built<D, T>> {
        let forest = if target == self.base {
            self.build_children(target, &[])?
        } else {
            let forest = self.build_from_node(target, &[])?;
            self.extend_and_merge(forest)?
        };

        Ok(Built {
            forest,
            plan: self.plan,
            split: self.split,
        })
    }

    fn tree(&self) -> &'a D {
        self.view.tree()
    }

    fn build_from_node(
        &mut self,
        node: D::Node,
        ancestors: &Ancestors<D::Node, T>,
    ) -> Result<Vec<TreeNode<D::Node, T>>> {
        match self.tree().node_type(node) {
            NodeType::Text => Ok(self.build_from_text(node, ancestors).into_iter().collect()),
            NodeType::Element => self.build_from_element(node, ancestors),
            NodeType::Comment | NodeType::Other => Ok(Vec::new()),
        }
    }

    fn build_from_text(
        &self,
        text: D::Node,
        ancestors: &Ancestors<D::Node, T>,
    ) -> Option<TreeNode<D::Node, T>> {
        if self.tree().text_len(text) == 0 {
            return None;
        }

        let inside_range = self.order.contains(text);
        if !inside_range && ancestors.is_empty() {
            return Some(TreeNode::Block(BlockNode::text(text)));
        }

        let range = FlatRange::at(self.view.parent(text)?, self.view.index_of(text)?);
        Some(TreeNode::Formatting(FormattingNode::new(
            range,
            inside_range,
            ancestors.to_vec(),
        )))
    }

    fn build_children(
        &mut self,
        element: D::Node,
        ancestors: &Ancestors<D::Node, T>,
    ) -> Result<Vec<TreeNode<D::Node, T>>> {
        let mut children = Vec::new();
        for child in self.view.children(element) {
            for node in self.build_from_node(child, ancestors)? {
                self.append_node(&mut children, node)?;
            }
        }
        Ok(children)
    }

    fn build_from_element(
        &mut self,
        element: D::Node,
        ancestors: &Ancestors<D::Node, T>,
    ) -> Result<Vec<TreeNode<D::Node, T>>> {
        if self.view.children(element).is_empty() {
            return Ok(Vec::new());
        }

        let verdict = if element == self.base {
            MatchType::None
        } else {
            self.format
                .classify(self.tree(), element)
                .map_err(SurroundError::callback(CallbackKind::Matcher))?
        };

        let (record, clear) = match verdict {
            MatchType::None => (None, None),
            MatchType::Remove { cache } => {
                (Some(Rc::new(Match::new(element, MatchKind::Remove, cache))), None)
            }
            MatchType::Clear { cache, clear } => (
                Some(Rc::new(Match::new(element, MatchKind::Clear, cache))),
                Some(clear),
            ),
        };

        let mut children = match &record {
            Some(record) => {
                let mut extended = ancestors.to_vec();
                extended.push(Rc::clone(record));
                self.build_children(element, &extended)?
            }
            None => self.build_children(element, ancestors)?,
        };

        if let Some(record) = &record {
            for child in &mut children {
                if let TreeNode::Formatting(node) = child {
                    node.cover_holes(record);
                }
            }

            if record.should_remove() {
                self.plan_removal(element, &mut children);
                return Ok(children);
            }
        }

        if let Some(clear) = clear {
            tracing::trace!(target: "weaver::surround", element = ?element, "planned clear");
            self.plan.clears.push((element, clear));
        }

        if children.is_empty() {
            return Ok(children);
        }

        if self.tree().is_block(element) {
            return Ok(vec![TreeNode::Block(BlockNode::element(element, children))]);
        }

        if element != self.base {
            if let Some(ascended) = self.try_ascend(element, &mut children) {
                return Ok(vec![TreeNode::Formatting(ascended)]);
            }
        }

        Ok(vec![TreeNode::Element(ElementNode::new(element, children))])
    }

    /// Unwrap `element` in the view and move the ranges of its top-level
    /// children to its parent.
    fn plan_removal(&mut self, element: D::Node, children: &mut [TreeNode<D::Node, T>]) {
        self.split.adjust_range(&self.view, element);

        let Some((parent, offset)) = self.view.unwrap(element) else {
            return;
        };
        for child in children.iter_mut() {
            if let TreeNode::Formatting(node) = child {
                node.range_mut().rebase_if_parent(element, parent, offset);
            }
        }

        tracing::trace!(
            target: "weaver::surround",
            element = ?element,
            parent = ?parent,
            offset,
            "planned removal"
        );
        self.plan.removals.push(element);
    }

    /// Lift a lone formatting child above `element`.
    fn try_ascend(
        &self,
        element: D::Node,
        children: &mut Vec<TreeNode<D::Node, T>>,
    ) -> Option<FormattingNode<D::Node, T>> {
        if children.len() != 1 || !children[0].is_formatting() {
            return None;
        }
        let parent = self.view.parent(element)?;
        let index = self.view.index_of(element)?;

        let Some(TreeNode::Formatting(mut node)) = children.pop() else {
            return None;
        };
        node.ascend_above(element, parent, index);
        tracing::trace!(target: "weaver::surround", element = ?element, "ascended");
        Some(node)
    }
}
