//! Content tree abstraction.
//!
//! The `ContentTree` trait is the minimal DOM interface the surround engine
//! consumes: navigation, element inspection, text access and a handful of
//! structural mutations. `Document` is the in-crate arena implementation; a
//! browser binding would implement the same trait over `web_sys::Node`.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Range;

/// Kind of a node in the content tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeType {
    Element,
    Text,
    Comment,
    /// Document, fragment or anything else that is neither of the above.
    Other,
}

/// Elements treated as block-level by the default `ContentTree::is_block`.
///
/// Formatting never merges or ascends across these.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "dialog",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// A mutable tree of elements and text.
///
/// All text offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait ContentTree {
    /// Handle to a node. Handles stay valid across mutations; a removed node
    /// simply becomes detached.
    type Node: Copy + Eq + Hash + Debug;

    // === Required: navigation ===

    fn node_type(&self, node: Self::Node) -> NodeType;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn child_count(&self, node: Self::Node) -> usize;

    fn child(&self, node: Self::Node, index: usize) -> Option<Self::Node>;

    // === Required: inspection ===

    /// Lowercase tag name, `None` for non-elements.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Number of attributes on an element, zero for anything else.
    fn attribute_count(&self, node: Self::Node) -> usize;

    /// Text data of text and comment nodes.
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Serialized form of the node: outer HTML for elements, escaped data for text.
    fn serialize(&self, node: Self::Node) -> String;

    // === Required: mutation ===

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: Self::Node, name: &str);

    /// Replace `element` with its own children.
    fn unwrap(&mut self, element: Self::Node);

    /// Move the children of `parent` in `range` into the detached `wrapper`,
    /// and insert `wrapper` where they were.
    fn wrap_children(&mut self, parent: Self::Node, range: Range<usize>, wrapper: Self::Node);

    /// Split a text node at a char offset. The original node keeps `..offset`,
    /// the returned node holds `offset..` and is inserted right after it.
    fn split_text(&mut self, node: Self::Node, offset: usize) -> Self::Node;

    // === Provided ===

    fn children(&self, node: Self::Node) -> Vec<Self::Node> {
        (0..self.child_count(node))
            .filter_map(|index| self.child(node, index))
            .collect()
    }

    fn first_child(&self, node: Self::Node) -> Option<Self::Node> {
        self.child(node, 0)
    }

    fn last_child(&self, node: Self::Node) -> Option<Self::Node> {
        self.child_count(node)
            .checked_sub(1)
            .and_then(|index| self.child(node, index))
    }

    fn index_in_parent(&self, node: Self::Node) -> Option<usize> {
        let parent = self.parent(node)?;
        (0..self.child_count(parent)).find(|&index| self.child(parent, index) == Some(node))
    }

    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        self.child(parent, index + 1)
    }

    fn previous_sibling(&self, node: Self::Node) -> Option<Self::Node> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        index.checked_sub(1).and_then(|i| self.child(parent, i))
    }

    fn is_element(&self, node: Self::Node) -> bool {
        self.node_type(node) == NodeType::Element
    }

    fn is_text(&self, node: Self::Node) -> bool {
        self.node_type(node) == NodeType::Text
    }

    /// Length of a text node in chars, zero for anything else.
    fn text_len(&self, node: Self::Node) -> usize {
        match self.node_type(node) {
            NodeType::Text => self.text(node).map_or(0, |t| t.chars().count()),
            _ => 0,
        }
    }

    /// DOM length: chars for character data, number of children otherwise.
    fn length(&self, node: Self::Node) -> usize {
        match self.node_type(node) {
            NodeType::Text | NodeType::Comment => {
                self.text(node).map_or(0, |t| t.chars().count())
            }
            _ => self.child_count(node),
        }
    }

    /// Whether formatting must stop at this element.
    fn is_block(&self, node: Self::Node) -> bool {
        self.tag_name(node)
            .is_some_and(|tag| BLOCK_ELEMENTS.contains(&tag))
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Concatenated text of all text descendants.
    fn text_content(&self, node: Self::Node) -> String {
        let mut out = String::new();
        collect_text(self, node, &mut out);
        out
    }
}

fn collect_text<D: ContentTree + ?Sized>(tree: &D, node: D::Node, out: &mut String) {
    match tree.node_type(node) {
        NodeType::Text => out.push_str(tree.text(node).unwrap_or_default()),
        NodeType::Comment => {}
        _ => {
            for child in tree.children(node) {
                collect_text(tree, child, out);
            }
        }
    }
}

/// Next node after `node` in tree order, skipping its descendants, without
/// leaving `base`.
pub(crate) fn next_node_outside<D: ContentTree + ?Sized>(
    tree: &D,
    node: D::Node,
    base: D::Node,
) -> Option<D::Node> {
    let mut current = node;
    while current != base {
        if let Some(next) = tree.next_sibling(current) {
            return Some(next);
        }
        current = tree.parent(current)?;
    }
    None
}

/// Previous node before `node` in reverse tree order, skipping its
/// ancestors, without leaving `base`.
pub(crate) fn previous_node_outside<D: ContentTree + ?Sized>(
    tree: &D,
    node: D::Node,
    base: D::Node,
) -> Option<D::Node> {
    let mut current = node;
    while current != base {
        if let Some(previous) = tree.previous_sibling(current) {
            return Some(previous);
        }
        current = tree.parent(current)?;
    }
    None
}

/// Child indices leading from the topmost ancestor to `node`.
pub(crate) fn path_from_root<D: ContentTree + ?Sized>(tree: &D, node: D::Node) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = node;
    while let Some(index) = tree.index_in_parent(current) {
        path.push(index);
        match tree.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    path.reverse();
    path
}
