//! Built-in formats for the common inline styles.
//!
//! Every format recognizes its dedicated tags (`<b>`, `<strong>`, ...) as
//! well as the matching inline CSS declaration. Tags are unwrapped. A
//! declaration is stripped from its element, and the element is unwrapped
//! only when it is a `span` carrying nothing else.
//!
//! The color formats cache the color found on existing matches, so content
//! outside the selection keeps its own color when it gets formatted again.

use crate::content::ContentTree;
use crate::error::BoxError;
use crate::format::{ElementTemplate, SurroundFormat};
use crate::match_type::MatchType;
use crate::style::{InlineStyle, remove_style_property, set_style_property};
use crate::tree::FormattingNode;

/// Bold via `<b>`; also matches `<strong>` and `font-weight: bold` or 700+.
pub fn bold<D: ContentTree + 'static, T: 'static>() -> SurroundFormat<D, T> {
    inline_format(&["b", "strong"], "font-weight", is_bold_weight, "b")
}

/// Italic via `<i>`; also matches `<em>` and `font-style: italic`.
pub fn italic<D: ContentTree + 'static, T: 'static>() -> SurroundFormat<D, T> {
    inline_format(
        &["i", "em"],
        "font-style",
        |value| value.eq_ignore_ascii_case("italic"),
        "i",
    )
}

/// Underline via `<u>`; also matches `text-decoration: underline`.
pub fn underline<D: ContentTree + 'static, T: 'static>() -> SurroundFormat<D, T> {
    inline_format(
        &["u"],
        "text-decoration",
        |value| value.eq_ignore_ascii_case("underline"),
        "u",
    )
}

/// Superscript via `<sup>`; also matches `vertical-align: super`.
pub fn superscript<D: ContentTree + 'static, T: 'static>() -> SurroundFormat<D, T> {
    inline_format(
        &["sup"],
        "vertical-align",
        |value| value.eq_ignore_ascii_case("super"),
        "sup",
    )
}

/// Subscript via `<sub>`; also matches `vertical-align: sub`.
pub fn subscript<D: ContentTree + 'static, T: 'static>() -> SurroundFormat<D, T> {
    inline_format(
        &["sub"],
        "vertical-align",
        |value| value.eq_ignore_ascii_case("sub"),
        "sub",
    )
}

/// Foreground color. Matches `<font color>` and `color` declarations.
pub fn text_color<D: ContentTree + 'static>(color: impl Into<String>) -> SurroundFormat<D, String> {
    color_format(Some("font"), "color", color.into())
}

/// Background color. Matches `background-color` declarations.
pub fn highlight_color<D: ContentTree + 'static>(
    color: impl Into<String>,
) -> SurroundFormat<D, String> {
    color_format(None, "background-color", color.into())
}

fn is_bold_weight(value: &str) -> bool {
    value.eq_ignore_ascii_case("bold")
        || value.eq_ignore_ascii_case("bolder")
        || value.parse::<u16>().is_ok_and(|weight| weight >= 700)
}

fn has_tag<D: ContentTree + ?Sized>(tree: &D, node: D::Node, tag: &str) -> bool {
    tree.tag_name(node)
        .is_some_and(|name| name.eq_ignore_ascii_case(tag))
}

fn inline_format<D: ContentTree + 'static, T: 'static>(
    tags: &'static [&'static str],
    property: &'static str,
    accepts: fn(&str) -> bool,
    wrapper: &'static str,
) -> SurroundFormat<D, T> {
    SurroundFormat::new(move |tree: &D, node: D::Node| {
        if tags.iter().any(|tag| has_tag(tree, node, tag)) {
            return Ok(MatchType::remove());
        }
        let style = InlineStyle::from_element(tree, node);
        Ok(match style.get(property) {
            Some(value) if accepts(value) => style_verdict(tree, node, &style, property, None),
            _ => MatchType::None,
        })
    })
    .with_surround_element(ElementTemplate::new(wrapper))
}

/// Verdict for an element carrying `property` in its inline style.
fn style_verdict<D: ContentTree + 'static, T: 'static>(
    tree: &D,
    node: D::Node,
    style: &InlineStyle,
    property: &'static str,
    cache: Option<T>,
) -> MatchType<D, T> {
    let bare_span =
        has_tag(tree, node, "span") && tree.attribute_count(node) == 1 && style.len() == 1;
    if bare_span {
        return MatchType::Remove { cache };
    }
    MatchType::Clear {
        cache,
        clear: Box::new(move |tree: &mut D, node: D::Node| {
            remove_style_property(tree, node, property);
            Ok(())
        }),
    }
}

fn color_format<D: ContentTree + 'static>(
    legacy_tag: Option<&'static str>,
    property: &'static str,
    color: String,
) -> SurroundFormat<D, String> {
    let inside = color.clone();
    let matcher = move |tree: &D, node: D::Node| -> Result<MatchType<D, String>, BoxError> {
        if let Some(tag) = legacy_tag {
            if has_tag(tree, node, tag) {
                if let Some(value) = tree.attribute(node, "color") {
                    let value = value.to_string();
                    if tree.attribute_count(node) == 1 {
                        return Ok(MatchType::remove_with(value));
                    }
                    return Ok(MatchType::clear_with(value, |tree: &mut D, node: D::Node| {
                        tree.remove_attribute(node, "color");
                        Ok(())
                    }));
                }
            }
        }

        let style = InlineStyle::from_element(tree, node);
        Ok(match style.get(property) {
            Some(value) => {
                let value = value.to_string();
                style_verdict(tree, node, &style, property, Some(value))
            }
            None => MatchType::None,
        })
    };

    let merge_color = color.clone();
    SurroundFormat::new(matcher)
        .with_formatter(move |tree: &mut D, node: &FormattingNode<D::Node, String>| {
            let value = node.cache(&inside).unwrap_or(&inside).clone();

            let extension = node
                .extensions()
                .iter()
                .copied()
                .find(|&element| has_tag(tree, element, "span"));
            if let Some(span) = extension {
                set_style_property(tree, span, property, &value);
                return Ok(false);
            }

            let range = node.range();
            if range.is_empty() {
                return Ok(false);
            }
            let span = tree.create_element("span");
            set_style_property(tree, span, property, &value);
            tree.wrap_children(
                range.parent(),
                range.start_index()..range.end_index(),
                span,
            );
            Ok(true)
        })
        .with_merger(move |_: &D, before, after| {
            Ok(before.cache(&merge_color) == after.cache(&merge_color))
        })
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::document::{Document, NodeId};
    use crate::range::DomRange;
    use crate::surround::{surround, unsurround};

    fn node(doc: &Document, path: &[usize]) -> NodeId {
        path.iter()
            .fold(doc.body(), |node, &index| doc.child(node, index).unwrap())
    }

    fn select(doc: &Document, path: &[usize]) -> DomRange<NodeId> {
        DomRange::select_node(doc, node(doc, path)).unwrap()
    }

    #[test]
    fn test_bold_matches_tags_and_weights() {
        let doc = Document::from_html(
            r#"<strong>a</strong><span style="font-weight: 700">b</span><span style="font-weight: 400">c</span>"#,
        );
        let format = bold::<Document, ()>();

        assert!(matches!(
            format.classify(&doc, node(&doc, &[0])).unwrap(),
            MatchType::Remove { .. }
        ));
        assert!(matches!(
            format.classify(&doc, node(&doc, &[1])).unwrap(),
            MatchType::Remove { .. }
        ));
        assert!(!format.classify(&doc, node(&doc, &[2])).unwrap().matches());
        let text = node(&doc, &[0, 0]);
        assert!(!format.classify(&doc, text).unwrap().matches());
    }

    #[test]
    fn test_bold_clears_shared_style() {
        let mut doc =
            Document::from_html(r#"<span style="font-weight: bold; color: red">x</span>y"#);
        let body = doc.body();
        let range = select(&doc, &[1]);

        surround(&mut doc, &range, body, &bold::<Document, ()>()).unwrap();

        assert_snapshot!(doc.inner_html(body), @r#"<b><span style="color: red;">x</span>y</b>"#);
    }

    #[test]
    fn test_bold_removes_bare_span() {
        let mut doc = Document::from_html(r#"<span style="font-weight: 700">x</span>y"#);
        let body = doc.body();
        let range = select(&doc, &[1]);

        surround(&mut doc, &range, body, &bold::<Document, ()>()).unwrap();

        assert_snapshot!(doc.inner_html(body), @"<b>xy</b>");
    }

    #[test]
    fn test_italic_absorbs_em() {
        let mut doc = Document::from_html("<em>a</em>b");
        let body = doc.body();
        let range = select(&doc, &[1]);

        surround(&mut doc, &range, body, &italic::<Document, ()>()).unwrap();

        assert_snapshot!(doc.inner_html(body), @"<i>ab</i>");
    }

    #[test]
    fn test_text_color_wraps_in_span() {
        let mut doc = Document::from_html("abc");
        let body = doc.body();
        let range = select(&doc, &[0]);

        surround(&mut doc, &range, body, &text_color::<Document>("red")).unwrap();

        assert_snapshot!(doc.inner_html(body), @r#"<span style="color: red;">abc</span>"#);
    }

    #[test]
    fn test_text_color_merges_equal_colors_only() {
        let mut doc = Document::from_html(r#"<span style="color: red">a</span>b"#);
        let body = doc.body();
        let range = select(&doc, &[1]);
        surround(&mut doc, &range, body, &text_color::<Document>("red")).unwrap();
        assert_snapshot!(doc.inner_html(body), @r#"<span style="color: red;">ab</span>"#);

        let mut doc = Document::from_html(r#"<span style="color: blue">a</span>b"#);
        let body = doc.body();
        let range = select(&doc, &[1]);
        surround(&mut doc, &range, body, &text_color::<Document>("red")).unwrap();
        assert_snapshot!(
            doc.inner_html(body),
            @r#"<span style="color: blue;">a</span><span style="color: red;">b</span>"#
        );
    }

    #[test]
    fn test_text_color_reuses_span_extension() {
        let mut doc = Document::from_html(r#"<span class="x">a</span>"#);
        let body = doc.body();
        let range = DomRange::select_node_contents(&doc, node(&doc, &[0, 0]));

        surround(&mut doc, &range, body, &text_color::<Document>("red")).unwrap();

        assert_snapshot!(doc.inner_html(body), @r#"<span class="x" style="color: red;">a</span>"#);
    }

    #[test]
    fn test_text_color_unsurround_keeps_outside_color() {
        let mut doc = Document::from_html(r#"<span style="color: red">abc</span>"#);
        let body = doc.body();
        let text = node(&doc, &[0, 0]);

        let range = DomRange::new(text, 1, text, 2);
        unsurround(&mut doc, &range, body, &text_color::<Document>("red")).unwrap();

        assert_snapshot!(
            doc.inner_html(body),
            @r#"<span style="color: red;">a</span>b<span style="color: red;">c</span>"#
        );
    }

    #[test]
    fn test_legacy_font_color() {
        let mut doc = Document::from_html(
            r#"<font color="blue" face="serif">a</font><font color="red">b</font>"#,
        );
        let body = doc.body();
        let range = select(&doc, &[1]);

        unsurround(&mut doc, &range, body, &text_color::<Document>("red")).unwrap();

        assert_snapshot!(
            doc.inner_html(body),
            @r#"<span style="color: blue;"><font face="serif">a</font></span>b"#
        );
    }

    #[test]
    fn test_highlight_color() {
        let mut doc = Document::from_html("x");
        let body = doc.body();
        let range = select(&doc, &[0]);

        let format = highlight_color::<Document>("yellow");
        surround(&mut doc, &range, body, &format).unwrap();

        assert_snapshot!(doc.inner_html(body), @r#"<span style="background-color: yellow;">x</span>"#);
    }
}
