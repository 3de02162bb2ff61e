//! Arena-backed content tree.
//!
//! All nodes live in one `Vec` and are addressed by `NodeId`. Removing a node
//! only detaches it, so handles never dangle during a surround operation.

use std::ops::Range;

use smol_str::SmolStr;

use crate::content::{ContentTree, NodeType};
use crate::html;

/// Handle to a node in a `Document`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Payload of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    Element {
        /// Always lowercase.
        tag: SmolStr,
        attributes: Vec<(SmolStr, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Clone, Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An in-memory rich-text tree rooted at a `body` element.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        let body = Node {
            data: NodeData::Element {
                tag: SmolStr::new_static("body"),
                attributes: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
        }
    }
}

impl Document {
    /// Create a document with an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document whose body holds the parsed fragment.
    pub fn from_html(fragment: &str) -> Self {
        let mut doc = Self::new();
        let body = doc.body;
        html::parse_fragment(&mut doc, body, fragment);
        doc
    }

    /// The root element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn data(&self, node: NodeId) -> &NodeData {
        &self.node(node).data
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment(text.into()))
    }

    /// Append `child` to `parent`, detaching it from its current parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.node(parent).children.len();
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` among the children of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.node_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Remove `node` from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != node);
        }
    }

    /// Replace the text of a text or comment node.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        match &mut self.node_mut(node).data {
            NodeData::Text(data) | NodeData::Comment(data) => *data = text.into(),
            NodeData::Element { .. } => {}
        }
    }

    /// Serialized children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in &self.node(node).children {
            html::serialize_into(self, child, &mut out);
        }
        out
    }

    /// Serialized `node` including its own tag.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        html::serialize_into(self, node, &mut out);
        out
    }

    /// Replace the children of `node` with a parsed fragment.
    pub fn set_inner_html(&mut self, node: NodeId, fragment: &str) {
        for child in std::mem::take(&mut self.node_mut(node).children) {
            self.node_mut(child).parent = None;
        }
        html::parse_fragment(self, node, fragment);
    }

    pub(crate) fn attributes(&self, node: NodeId) -> &[(SmolStr, String)] {
        match &self.node(node).data {
            NodeData::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub(crate) fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

impl ContentTree for Document {
    type Node = NodeId;

    fn node_type(&self, node: NodeId) -> NodeType {
        match self.node(node).data {
            NodeData::Element { .. } => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.node(node).children.len()
    }

    fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.node(node).children.get(index).copied()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.node(node).parent?;
        self.node(parent).children.iter().position(|&c| c == node)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attributes(node)
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn attribute_count(&self, node: NodeId) -> usize {
        self.attributes(node).len()
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Text(data) | NodeData::Comment(data) => Some(data),
            NodeData::Element { .. } => None,
        }
    }

    fn serialize(&self, node: NodeId) -> String {
        self.outer_html(node)
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element {
            tag: SmolStr::new(tag.to_ascii_lowercase()),
            attributes: Vec::new(),
        })
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attributes, .. } = &mut self.node_mut(node).data {
            match attributes
                .iter_mut()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
            {
                Some((_, existing)) => *existing = value.to_string(),
                None => attributes.push((
                    SmolStr::new(name.to_ascii_lowercase()),
                    value.to_string(),
                )),
            }
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let NodeData::Element { attributes, .. } = &mut self.node_mut(node).data {
            attributes.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        }
    }

    fn unwrap(&mut self, element: NodeId) {
        let Some(parent) = self.node(element).parent else {
            return;
        };
        let Some(index) = self.index_in_parent(element) else {
            return;
        };

        let children = std::mem::take(&mut self.node_mut(element).children);
        for &child in &children {
            self.node_mut(child).parent = Some(parent);
        }
        self.node_mut(parent)
            .children
            .splice(index..index + 1, children);
        self.node_mut(element).parent = None;
    }

    fn wrap_children(&mut self, parent: NodeId, range: Range<usize>, wrapper: NodeId) {
        self.detach(wrapper);

        let len = self.node(parent).children.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);

        let moved: Vec<NodeId> = self.node_mut(parent).children.drain(start..end).collect();
        for &child in &moved {
            self.node_mut(child).parent = Some(wrapper);
        }
        self.node_mut(wrapper).children.extend(moved);
        self.node_mut(parent).children.insert(start, wrapper);
        self.node_mut(wrapper).parent = Some(parent);
    }

    fn split_text(&mut self, node: NodeId, offset: usize) -> NodeId {
        let tail = match &mut self.node_mut(node).data {
            NodeData::Text(data) => {
                let at = data
                    .char_indices()
                    .nth(offset)
                    .map_or(data.len(), |(byte, _)| byte);
                data.split_off(at)
            }
            _ => String::new(),
        };

        let new_node = self.create_text(tail);
        if let (Some(parent), Some(index)) = (self.node(node).parent, self.index_in_parent(node)) {
            self.insert_child(parent, index + 1, new_node);
        }
        new_node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_splices_children() {
        let mut doc = Document::from_html("a<b>b<i>c</i></b>d");
        let b = doc.child(doc.body(), 1).unwrap();

        doc.unwrap(b);

        assert_eq!(doc.inner_html(doc.body()), "ab<i>c</i>d");
        assert_eq!(doc.child_count(doc.body()), 4);
        assert_eq!(doc.parent(b), None);
        let i = doc.child(doc.body(), 2).unwrap();
        assert_eq!(doc.parent(i), Some(doc.body()));
    }

    #[test]
    fn test_wrap_children() {
        let mut doc = Document::from_html("a<br>b<i>c</i>");
        let body = doc.body();
        let wrapper = doc.create_element("B");

        doc.wrap_children(body, 1..3, wrapper);

        assert_eq!(doc.inner_html(body), "a<b><br>b</b><i>c</i>");
        assert_eq!(doc.index_in_parent(wrapper), Some(1));
    }

    #[test]
    fn test_split_text_counts_chars() {
        let mut doc = Document::from_html("héllo");
        let text = doc.first_child(doc.body()).unwrap();

        let tail = doc.split_text(text, 2);

        assert_eq!(doc.text(text), Some("hé"));
        assert_eq!(doc.text(tail), Some("llo"));
        assert_eq!(doc.next_sibling(text), Some(tail));
        assert_eq!(doc.inner_html(doc.body()), "héllo");
    }

    #[test]
    fn test_split_text_at_end_leaves_empty_tail() {
        let mut doc = Document::from_html("abc");
        let text = doc.first_child(doc.body()).unwrap();

        let tail = doc.split_text(text, 3);

        assert_eq!(doc.text(tail), Some(""));
        assert_eq!(doc.child_count(doc.body()), 2);
    }

    #[test]
    fn test_attributes_are_case_insensitive() {
        let mut doc = Document::from_html(r#"<span STYLE="color: red">x</span>"#);
        let span = doc.first_child(doc.body()).unwrap();

        assert_eq!(doc.attribute(span, "style"), Some("color: red"));
        doc.set_attribute(span, "Style", "color: blue");
        assert_eq!(doc.outer_html(span), r#"<span style="color: blue">x</span>"#);
        doc.remove_attribute(span, "style");
        assert_eq!(doc.outer_html(span), "<span>x</span>");
    }

    #[test]
    fn test_set_inner_html_detaches_old_children() {
        let mut doc = Document::from_html("<b>old</b>");
        let body = doc.body();
        let old = doc.first_child(body).unwrap();

        doc.set_inner_html(body, "<i>new</i>");

        assert_eq!(doc.parent(old), None);
        assert_eq!(doc.inner_html(body), "<i>new</i>");
    }
}
