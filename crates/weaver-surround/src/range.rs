//! Selection ranges over a content tree.
//!
//! `DomRange` is the equivalent of a host `Range`: an ordered pair of
//! boundary points, each a container node plus an offset. For text
//! containers the offset counts chars; for everything else it counts
//! children.

use std::cmp::Ordering;

use crate::content::{ContentTree, NodeType, path_from_root};
use crate::error::{Result, SurroundError};

/// A point between two children of `container`, or between two chars of a
/// text `container`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary<N> {
    pub container: N,
    pub offset: usize,
}

impl<N: Copy> Boundary<N> {
    pub fn new(container: N, offset: usize) -> Self {
        Self { container, offset }
    }

    /// Tree-order position of this boundary: the child path of the
    /// container followed by the offset.
    fn position<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D) -> Vec<usize> {
        let mut path = path_from_root(tree, self.container);
        path.push(self.offset);
        path
    }
}

/// An ordered pair of boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomRange<N> {
    start: Boundary<N>,
    end: Boundary<N>,
}

impl<N: Copy + Eq> DomRange<N> {
    pub fn new(
        start_container: N,
        start_offset: usize,
        end_container: N,
        end_offset: usize,
    ) -> Self {
        Self {
            start: Boundary::new(start_container, start_offset),
            end: Boundary::new(end_container, end_offset),
        }
    }

    pub fn from_boundaries(start: Boundary<N>, end: Boundary<N>) -> Self {
        Self { start, end }
    }

    pub fn collapsed(container: N, offset: usize) -> Self {
        Self::new(container, offset, container, offset)
    }

    /// Range around `node` itself, addressed in its parent.
    pub fn select_node<D: ContentTree<Node = N> + ?Sized>(tree: &D, node: N) -> Option<Self> {
        let parent = tree.parent(node)?;
        let index = tree.index_in_parent(node)?;
        Some(Self::new(parent, index, parent, index + 1))
    }

    /// Range over everything inside `node`.
    pub fn select_node_contents<D: ContentTree<Node = N> + ?Sized>(tree: &D, node: N) -> Self {
        Self::new(node, 0, node, tree.length(node))
    }

    pub fn start(&self) -> Boundary<N> {
        self.start
    }

    pub fn end(&self) -> Boundary<N> {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node containing both boundary containers.
    pub fn common_ancestor<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D) -> Option<N> {
        let mut current = Some(self.end.container);
        while let Some(node) = current {
            if tree.contains(node, self.start.container) {
                return Some(node);
            }
            current = tree.parent(node);
        }
        None
    }

    /// Check that both boundaries sit inside `base`, address existing
    /// positions, and are in order.
    pub fn validate<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D, base: N) -> Result<()> {
        for (which, boundary) in [("start", self.start), ("end", self.end)] {
            if !tree.contains(base, boundary.container) {
                return Err(SurroundError::invalid_range(format!(
                    "{which} container is not inside the base element"
                )));
            }
            if boundary.offset > tree.length(boundary.container) {
                return Err(SurroundError::invalid_range(format!(
                    "{which} offset {} is out of bounds",
                    boundary.offset
                )));
            }
        }
        if compare_boundaries(tree, self.start, self.end) == Ordering::Greater {
            return Err(SurroundError::invalid_range("start is after end"));
        }
        Ok(())
    }

    /// Whether `node` lies entirely between the two boundaries.
    pub fn contains_node<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D, node: N) -> bool {
        let Some(selected) = Self::select_node(tree, node) else {
            return false;
        };
        compare_boundaries(tree, self.start, selected.start) != Ordering::Greater
            && compare_boundaries(tree, selected.end, self.end) != Ordering::Greater
    }

    /// The selected text, like `Range.toString()`.
    pub fn text<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D) -> String {
        let mut out = String::new();
        if let Some(root) = self.common_ancestor(tree) {
            self.collect_text(tree, root, &mut out);
        }
        out
    }

    fn collect_text<D: ContentTree<Node = N> + ?Sized>(&self, tree: &D, node: N, out: &mut String) {
        match tree.node_type(node) {
            NodeType::Text => {
                let len = tree.text_len(node);
                let from = if node == self.start.container {
                    self.start.offset
                } else {
                    0
                };
                let to = if node == self.end.container {
                    self.end.offset
                } else {
                    len
                };
                let touched = node == self.start.container || node == self.end.container;
                let contained = touched
                    || (compare_boundaries(tree, self.start, Boundary::new(node, 0)).is_le()
                        && compare_boundaries(tree, Boundary::new(node, len), self.end).is_le());
                if contained && from < to {
                    let text = tree.text(node).unwrap_or_default();
                    out.extend(text.chars().skip(from).take(to - from));
                }
            }
            NodeType::Comment => {}
            _ => {
                for child in tree.children(node) {
                    self.collect_text(tree, child, out);
                }
            }
        }
    }
}

/// Tree-order comparison of two boundaries of the same tree.
pub fn compare_boundaries<D: ContentTree + ?Sized>(
    tree: &D,
    a: Boundary<D::Node>,
    b: Boundary<D::Node>,
) -> Ordering {
    if a.container == b.container {
        return a.offset.cmp(&b.offset);
    }
    a.position(tree).cmp(&b.position(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_select_node_and_contents() {
        let doc = Document::from_html("a<b>bc</b>d");
        let body = doc.body();
        let b = doc.child(body, 1).unwrap();

        let range = DomRange::select_node(&doc, b).unwrap();
        assert_eq!(range.start(), Boundary::new(body, 1));
        assert_eq!(range.end(), Boundary::new(body, 2));
        assert_eq!(range.text(&doc), "bc");

        let inner = DomRange::select_node_contents(&doc, b);
        assert_eq!(inner.end(), Boundary::new(b, 1));
        assert!(!inner.is_collapsed());
    }

    #[test]
    fn test_text_spans_partial_nodes() {
        let doc = Document::from_html("111<b>222</b>333");
        let body = doc.body();
        let first = doc.child(body, 0).unwrap();
        let last = doc.child(body, 2).unwrap();

        let range = DomRange::new(first, 1, last, 2);

        assert_eq!(range.common_ancestor(&doc), Some(body));
        assert_eq!(range.text(&doc), "1122233");
    }

    #[test]
    fn test_compare_boundaries() {
        let doc = Document::from_html("x<b>y</b>");
        let body = doc.body();
        let b = doc.child(body, 1).unwrap();
        let y = doc.first_child(b).unwrap();

        assert_eq!(
            compare_boundaries(&doc, Boundary::new(body, 1), Boundary::new(y, 0)),
            Ordering::Less
        );
        assert_eq!(
            compare_boundaries(&doc, Boundary::new(body, 2), Boundary::new(y, 1)),
            Ordering::Greater
        );
        assert_eq!(
            compare_boundaries(&doc, Boundary::new(b, 0), Boundary::new(b, 0)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_contains_node() {
        let doc = Document::from_html("x<b>y</b>z");
        let body = doc.body();
        let b = doc.child(body, 1).unwrap();
        let z = doc.child(body, 2).unwrap();

        let range = DomRange::new(body, 1, body, 2);
        assert!(range.contains_node(&doc, b));
        assert!(!range.contains_node(&doc, z));
    }

    #[test]
    fn test_validate() {
        let doc = Document::from_html("abc<b>d</b>");
        let body = doc.body();
        let text = doc.child(body, 0).unwrap();
        let b = doc.child(body, 1).unwrap();

        let whole = DomRange::new(text, 0, text, 3);
        assert!(whole.validate(&doc, body).is_ok());
        assert!(matches!(
            DomRange::new(text, 0, text, 4).validate(&doc, body),
            Err(SurroundError::InvalidRange { .. })
        ));
        assert!(matches!(
            DomRange::new(text, 2, text, 1).validate(&doc, body),
            Err(SurroundError::InvalidRange { .. })
        ));
        assert!(matches!(
            DomRange::new(text, 0, text, 1).validate(&doc, b),
            Err(SurroundError::InvalidRange { .. })
        ));
    }
}
