use super::Builder;
use crate::content::ContentTree;
use crate::error::Result;
use crate::flat_range::FlatRange;
use crate::tree::TreeNode;

impl<D: ContentTree, T> Builder<'_, D, T> {
    /// Grow a lone formatting node sideways into its siblings, and upwards
    /// over its parent while it stays alone.
    ///
    /// Never ascends over `base` or a block element. Siblings are built here
    /// for the first time, so no element is classified twice.
    pub(super) fn extend_and_merge(
        &mut self,
        mut forest: Vec<TreeNode<D::Node, T>>,
    ) -> Result<Vec<TreeNode<D::Node, T>>> {
        loop {
            if forest.len() != 1 {
                return Ok(forest);
            }
            let mut node = match forest.pop() {
                Some(TreeNode::Formatting(node)) => node,
                Some(other) => return Ok(vec![other]),
                None => return Ok(forest),
            };

            let parent = node.range().parent();
            let siblings = self.view.children(parent);
            let (start, end) = (node.range().start_index(), node.range().end_index());
            let last = end.checked_sub(1).and_then(|i| siblings.get(i));
            let (Some(&first), Some(&last)) = (siblings.get(start), last) else {
                return Ok(vec![TreeNode::Formatting(node)]);
            };

            let mut merged = Vec::new();
            for sibling in &siblings[..start] {
                for built in self.build_from_node(*sibling, &[])? {
                    self.append_node(&mut merged, built)?;
                }
            }

            // Siblings before the node may have been unwrapped.
            if let (Some(start), Some(last)) =
                (self.view.index_of(first), self.view.index_of(last))
            {
                *node.range_mut() = FlatRange::new(parent, start, last + 1);
            }
            self.append_node(&mut merged, TreeNode::Formatting(node))?;

            for sibling in siblings.iter().skip(end) {
                for built in self.build_from_node(*sibling, &[])? {
                    self.append_node(&mut merged, built)?;
                }
            }

            let ascendable = merged.len() == 1
                && merged[0].is_formatting()
                && parent != self.base
                && !self.tree().is_block(parent);
            if !ascendable {
                return Ok(merged);
            }
            let (Some(grandparent), Some(index)) =
                (self.view.parent(parent), self.view.index_of(parent))
            else {
                return Ok(merged);
            };
            let Some(TreeNode::Formatting(mut node)) = merged.pop() else {
                return Ok(merged);
            };

            node.ascend_above(parent, grandparent, index);
            tracing::trace!(target: "weaver::surround", element = ?parent, "extended above");
            forest = vec![TreeNode::Formatting(node)];
        }
    }
}
