//! Child-index overlay used while building the formatting forest.
//!
//! The build phase decides which matched elements disappear before anything
//! is mutated. `TreeView` reads through to the underlying tree and records
//! those unwraps as overrides, so later indices are computed against the
//! shape the tree will have once the plan runs.

use std::collections::HashMap;

use crate::content::ContentTree;

pub(crate) struct TreeView<'a, D: ContentTree + ?Sized> {
    tree: &'a D,
    children: HashMap<D::Node, Vec<D::Node>>,
    parents: HashMap<D::Node, Option<D::Node>>,
}

impl<'a, D: ContentTree + ?Sized> TreeView<'a, D> {
    pub(crate) fn new(tree: &'a D) -> Self {
        Self {
            tree,
            children: HashMap::new(),
            parents: HashMap::new(),
        }
    }

    /// The tree as it was before any planned removal.
    pub(crate) fn tree(&self) -> &'a D {
        self.tree
    }

    pub(crate) fn parent(&self, node: D::Node) -> Option<D::Node> {
        match self.parents.get(&node) {
            Some(parent) => *parent,
            None => self.tree.parent(node),
        }
    }

    pub(crate) fn children(&self, node: D::Node) -> Vec<D::Node> {
        match self.children.get(&node) {
            Some(children) => children.clone(),
            None => self.tree.children(node),
        }
    }

    pub(crate) fn index_of(&self, node: D::Node) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    pub(crate) fn first_child(&self, node: D::Node) -> Option<D::Node> {
        self.children(node).first().copied()
    }

    pub(crate) fn last_child(&self, node: D::Node) -> Option<D::Node> {
        self.children(node).last().copied()
    }

    pub(crate) fn next_sibling(&self, node: D::Node) -> Option<D::Node> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == node)?;
        siblings.get(index + 1).copied()
    }

    pub(crate) fn previous_sibling(&self, node: D::Node) -> Option<D::Node> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == node)?;
        index.checked_sub(1).and_then(|i| siblings.get(i).copied())
    }

    /// Replace `element` with its children in the view. Returns the parent
    /// and the index the first child now sits at.
    pub(crate) fn unwrap(&mut self, element: D::Node) -> Option<(D::Node, usize)> {
        let parent = self.parent(element)?;
        let mut siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == element)?;

        let moved = self.children(element);
        for &child in &moved {
            self.parents.insert(child, Some(parent));
        }
        siblings.splice(index..index + 1, moved);

        self.children.insert(parent, siblings);
        self.children.insert(element, Vec::new());
        self.parents.insert(element, None);
        Some((parent, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_unwrap_is_not_applied_to_tree() {
        let doc = Document::from_html("a<b>b<i>c</i></b>d");
        let body = doc.body();
        let b = doc.child(body, 1).unwrap();
        let i = doc.child(b, 1).unwrap();

        let mut view = TreeView::new(&doc);
        assert_eq!(view.unwrap(b), Some((body, 1)));

        assert_eq!(view.children(body).len(), 4);
        assert_eq!(view.index_of(i), Some(2));
        assert_eq!(view.parent(i), Some(body));
        assert_eq!(view.parent(b), None);
        assert_eq!(view.next_sibling(i), doc.child(body, 2));

        assert_eq!(doc.inner_html(body), "a<b>b<i>c</i></b>d");
    }

    #[test]
    fn test_nested_unwraps_compose() {
        let doc = Document::from_html("<b>1<b>2</b></b>3");
        let body = doc.body();
        let outer = doc.child(body, 0).unwrap();
        let inner = doc.child(outer, 1).unwrap();
        let two = doc.first_child(inner).unwrap();

        let mut view = TreeView::new(&doc);
        assert_eq!(view.unwrap(inner), Some((outer, 1)));
        assert_eq!(view.last_child(outer), Some(two));
        assert_eq!(view.unwrap(outer), Some((body, 0)));

        assert_eq!(view.index_of(two), Some(1));
        assert_eq!(view.first_child(body), doc.first_child(outer));
        assert_eq!(view.previous_sibling(two), doc.first_child(outer));
    }
}
