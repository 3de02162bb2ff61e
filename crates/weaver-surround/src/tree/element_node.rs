use super::TreeNode;

/// An element that stays where it is.
#[derive(Clone, Debug)]
pub struct ElementNode<N, T> {
    element: N,
    inside_range: bool,
    children: Vec<TreeNode<N, T>>,
}

impl<N: Copy, T> ElementNode<N, T> {
    pub(crate) fn new(element: N, children: Vec<TreeNode<N, T>>) -> Self {
        Self {
            element,
            inside_range: super::all_inside(&children),
            children,
        }
    }

    pub fn element(&self) -> N {
        self.element
    }
}

impl<N, T> ElementNode<N, T> {
    pub fn inside_range(&self) -> bool {
        self.inside_range
    }

    pub fn children(&self) -> &[TreeNode<N, T>] {
        &self.children
    }
}
