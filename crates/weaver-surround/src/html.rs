//! HTML fragment parsing and serialization for `Document`.
//!
//! Tokenizing and character references are left to `html5ever`; the sink
//! below builds the arena from the token stream. Unmatched end tags are
//! ignored and unclosed elements are closed at the end of the fragment.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use smol_str::SmolStr;

use crate::content::ContentTree;
use crate::document::{Document, NodeData, NodeId};

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parse `fragment` and append the resulting nodes to `parent`.
pub fn parse_fragment(doc: &mut Document, parent: NodeId, fragment: &str) {
    let sink = FragmentSink {
        state: RefCell::new(SinkState {
            doc,
            root: parent,
            open: Vec::new(),
        }),
    };
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(fragment));

    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let _ = tokenizer.feed(&input);
    tokenizer.end();
}

struct FragmentSink<'a> {
    state: RefCell<SinkState<'a>>,
}

struct SinkState<'a> {
    doc: &'a mut Document,
    root: NodeId,
    /// Open elements, innermost last.
    open: Vec<(NodeId, SmolStr)>,
}

impl TokenSink for FragmentSink<'_> {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut state = self.state.borrow_mut();
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => state.start_tag(tag),
                TagKind::EndTag => state.end_tag(&tag.name),
            },
            Token::CharacterTokens(text) => state.text(&text),
            Token::CommentToken(text) => {
                let node = state.doc.create_comment(&*text);
                let parent = state.current();
                state.doc.append_child(parent, node);
            }
            Token::ParseError(error) => {
                tracing::trace!(target: "weaver::html", %error, "fragment parse error");
            }
            Token::DoctypeToken(_) | Token::NullCharacterToken | Token::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}

impl SinkState<'_> {
    fn current(&self) -> NodeId {
        self.open.last().map_or(self.root, |(node, _)| *node)
    }

    fn text(&mut self, text: &str) {
        let parent = self.current();
        // Adjacent character runs end up in a single text node, as in a browser.
        if let Some(last) = self.doc.last_child(parent) {
            if let NodeData::Text(existing) = self.doc.data(last) {
                let joined = format!("{existing}{text}");
                self.doc.set_text(last, joined);
                return;
            }
        }
        let node = self.doc.create_text(text);
        self.doc.append_child(parent, node);
    }

    fn start_tag(&mut self, tag: Tag) {
        let name = SmolStr::new(&*tag.name);
        let attributes = tag
            .attrs
            .into_iter()
            .map(|attribute| {
                let name = SmolStr::new(&*attribute.name.local);
                (name, attribute.value.to_string())
            })
            .collect();

        let node = self.doc.alloc(NodeData::Element {
            tag: name.clone(),
            attributes,
        });
        let parent = self.current();
        self.doc.append_child(parent, node);
        if !tag.self_closing && !is_void_element(&name) {
            self.open.push((node, name));
        }
    }

    fn end_tag(&mut self, name: &str) {
        if let Some(depth) = self.open.iter().rposition(|(_, tag)| tag.as_str() == name) {
            self.open.truncate(depth);
        }
    }
}

pub fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

pub fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Append the serialized form of `node` to `out`.
pub fn serialize_into(doc: &Document, node: NodeId, out: &mut String) {
    match doc.data(node) {
        NodeData::Text(text) => escape_text(text, out),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Element { tag, attributes } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attribute(value, out);
                out.push('"');
            }
            out.push('>');

            if is_void_element(tag) {
                return;
            }
            for child in doc.children(node) {
                serialize_into(doc, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NodeType;

    fn round_trip(html: &str) -> String {
        let doc = Document::from_html(html);
        doc.inner_html(doc.body())
    }

    #[test]
    fn test_round_trip_common_markup() {
        for html in [
            "111222",
            "<b>111</b>222",
            "before<br><ul><li>First</li><li>Second</li></ul>",
            r#"<span style="color: red" class="x">a</span>"#,
            "<i>1</i><b><i>2</i>3<i>4</i></b><i>5</i>",
            "a<!-- note -->b",
        ] {
            assert_eq!(round_trip(html), html);
        }
    }

    #[test]
    fn test_void_and_self_closing() {
        let doc = Document::from_html("a<br/>b<img src=x.png>c<span/>d");
        let body = doc.body();

        assert_eq!(doc.child_count(body), 7);
        assert_eq!(doc.inner_html(body), r#"a<br>b<img src="x.png">c<span></span>d"#);
    }

    #[test]
    fn test_unmatched_end_tags_are_ignored() {
        assert_eq!(round_trip("a</i>b<b>c"), "ab<b>c</b>");
        assert_eq!(round_trip("<b><i>x</b>y"), "<b><i>x</i></b>y");
    }

    #[test]
    fn test_entities() {
        let doc = Document::from_html("a &amp; b &lt;c&gt; &#65;&#x42;&nbsp;&bogus;");
        let text = doc.first_child(doc.body()).unwrap();

        assert_eq!(doc.node_type(text), NodeType::Text);
        assert_eq!(doc.text(text), Some("a & b <c> AB\u{a0}&bogus;"));
        assert_eq!(
            doc.inner_html(doc.body()),
            "a &amp; b &lt;c&gt; AB&nbsp;&amp;bogus;"
        );
    }

    #[test]
    fn test_quoted_markup_and_duplicate_attributes() {
        assert_eq!(
            round_trip(r#"<span title="a>b" title="c">x</span>"#),
            r#"<span title="a>b">x</span>"#
        );
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        assert_eq!(round_trip("1 < 2"), "1 &lt; 2");
    }

    #[test]
    fn test_uppercase_tags_are_lowercased() {
        assert_eq!(round_trip("<B>x</B>"), "<b>x</b>");
    }
}
