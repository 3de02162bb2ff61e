use super::Builder;
use crate::content::ContentTree;
use crate::error::{CallbackKind, Result, SurroundError};
use crate::tree::{FormattingNode, TreeNode};

impl<D: ContentTree, T> Builder<'_, D, T> {
    /// Push `node` onto `nodes`, merging it with the formatting nodes
    /// directly before it for as long as that is allowed.
    pub(super) fn append_node(
        &self,
        nodes: &mut Vec<TreeNode<D::Node, T>>,
        node: TreeNode<D::Node, T>,
    ) -> Result<()> {
        let TreeNode::Formatting(mut current) = node else {
            nodes.push(node);
            return Ok(());
        };

        loop {
            let mergeable = match nodes.last() {
                Some(TreeNode::Formatting(previous)) => self.try_merge(previous, &current)?,
                _ => false,
            };
            if !mergeable {
                break;
            }
            if let Some(TreeNode::Formatting(previous)) = nodes.pop() {
                current = FormattingNode::merge(previous, current);
            }
        }

        tracing::trace!(
            target: "weaver::surround",
            parent = ?current.range().parent(),
            start = current.range().start_index(),
            end = current.range().end_index(),
            "appended formatting node"
        );
        nodes.push(TreeNode::Formatting(current));
        Ok(())
    }

    fn try_merge(
        &self,
        before: &FormattingNode<D::Node, T>,
        after: &FormattingNode<D::Node, T>,
    ) -> Result<bool> {
        if before.range().parent() != after.range().parent() {
            return Ok(false);
        }
        if !self.policy.allows_merge(before, after) {
            return Ok(false);
        }
        match self.format.merger() {
            Some(merger) => merger(self.tree(), before, after)
                .map_err(SurroundError::callback(CallbackKind::Merger)),
            None => Ok(true),
        }
    }
}
