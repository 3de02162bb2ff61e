//! Intermediate formatting tree.
//!
//! The build phase turns the content under the operation's target into a
//! forest of these nodes. The nodes only live for one operation.

mod block_node;
mod element_node;
mod formatting_node;

pub use block_node::BlockNode;
pub use element_node::ElementNode;
pub use formatting_node::FormattingNode;

/// One node of the formatting forest.
#[derive(Clone, Debug)]
pub enum TreeNode<N, T> {
    /// An element kept as-is, with formatting happening somewhere below.
    Element(ElementNode<N, T>),
    /// A span that gets formatted.
    Formatting(FormattingNode<N, T>),
    /// Content formatting must not merge across or ascend over.
    Block(BlockNode<N, T>),
}

impl<N, T> TreeNode<N, T> {
    /// Whether all text under this node lies inside the selection.
    pub fn inside_range(&self) -> bool {
        match self {
            TreeNode::Element(node) => node.inside_range(),
            TreeNode::Formatting(node) => node.inside_range(),
            TreeNode::Block(node) => node.inside_range(),
        }
    }

    pub fn children(&self) -> &[TreeNode<N, T>] {
        match self {
            TreeNode::Element(node) => node.children(),
            TreeNode::Formatting(node) => node.children(),
            TreeNode::Block(node) => node.children(),
        }
    }

    pub fn as_formatting(&self) -> Option<&FormattingNode<N, T>> {
        match self {
            TreeNode::Formatting(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_formatting(&self) -> bool {
        matches!(self, TreeNode::Formatting(_))
    }
}

pub(crate) fn all_inside<N, T>(children: &[TreeNode<N, T>]) -> bool {
    children.iter().all(TreeNode::inside_range)
}
