use super::TreeNode;

/// A hard stop for merging and ascension.
///
/// Produced for text outside the selection that no match covers, and for
/// block-level elements. Block elements keep their children so formatting
/// still applies inside them.
#[derive(Clone, Debug)]
pub struct BlockNode<N, T> {
    node: N,
    inside_range: bool,
    children: Vec<TreeNode<N, T>>,
}

impl<N: Copy, T> BlockNode<N, T> {
    pub(crate) fn text(node: N) -> Self {
        Self {
            node,
            inside_range: false,
            children: Vec::new(),
        }
    }

    pub(crate) fn element(node: N, children: Vec<TreeNode<N, T>>) -> Self {
        Self {
            node,
            inside_range: super::all_inside(&children),
            children,
        }
    }

    pub fn node(&self) -> N {
        self.node
    }
}

impl<N, T> BlockNode<N, T> {
    pub fn inside_range(&self) -> bool {
        self.inside_range
    }

    pub fn children(&self) -> &[TreeNode<N, T>] {
        &self.children
    }
}
