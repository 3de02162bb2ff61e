//! Inline `style` attribute helpers.
//!
//! The declaration list is tokenized with `cssparser`, so values holding
//! strings, `url(...)` or comments survive a parse and write-back. Property
//! names compare case-insensitively; values are kept as written.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};
use smol_str::SmolStr;

use crate::content::ContentTree;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Declaration {
    name: SmolStr,
    value: String,
    important: bool,
}

/// Parsed `style` attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<Declaration>,
}

struct DeclarationListParser;

impl<'i> DeclarationParser<'i> for DeclarationListParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _declaration_start: &ParserState,
    ) -> Result<Declaration, ParseError<'i, ()>> {
        let value = input.parse_until_before(cssparser::Delimiter::Bang, |input| {
            let start = input.position();
            while input.next().is_ok() {}
            Ok::<_, ParseError<'i, ()>>(input.slice_from(start).trim())
        })?;
        let important = input.try_parse(cssparser::parse_important).is_ok();
        input.expect_exhausted()?;

        if value.is_empty() {
            return Err(input.new_custom_error(()));
        }
        Ok(Declaration {
            name: SmolStr::new(name.to_ascii_lowercase()),
            value: value.to_string(),
            important,
        })
    }
}

impl<'i> AtRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for DeclarationListParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

impl InlineStyle {
    /// Parse a declaration list. Invalid declarations are skipped.
    pub fn parse(style: &str) -> Self {
        let mut input = ParserInput::new(style);
        let mut parser = Parser::new(&mut input);
        let mut list_parser = DeclarationListParser;
        let declarations = RuleBodyParser::new(&mut parser, &mut list_parser)
            .filter_map(Result::ok)
            .collect();
        Self { declarations }
    }

    pub fn from_element<D: ContentTree + ?Sized>(tree: &D, element: D::Node) -> Self {
        tree.attribute(element, "style")
            .map(Self::parse)
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|declaration| declaration.value.as_str())
    }

    pub fn is_important(&self, name: &str) -> bool {
        self.find(name).is_some_and(|declaration| declaration.important)
    }

    /// Set `name` to `value`. A replaced declaration loses its `!important`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .declarations
            .iter_mut()
            .find(|declaration| declaration.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => {
                existing.value = value;
                existing.important = false;
            }
            None => self.declarations.push(Declaration {
                name: SmolStr::new(name.to_ascii_lowercase()),
                value,
                important: false,
            }),
        }
    }

    /// Returns whether the property was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.declarations.len();
        self.declarations
            .retain(|declaration| !declaration.name.eq_ignore_ascii_case(name));
        self.declarations.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|declaration| declaration.name.eq_ignore_ascii_case(name))
    }

    /// Write back to `element`, dropping the attribute when nothing is left.
    pub fn write_to<D: ContentTree + ?Sized>(&self, tree: &mut D, element: D::Node) {
        if self.is_empty() {
            tree.remove_attribute(element, "style");
        } else {
            tree.set_attribute(element, "style", &self.to_string());
        }
    }
}

impl std::fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, declaration) in self.declarations.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {}", declaration.name, declaration.value)?;
            if declaration.important {
                f.write_str(" !important")?;
            }
            f.write_str(";")?;
        }
        Ok(())
    }
}

pub fn get_style_property<D: ContentTree + ?Sized>(
    tree: &D,
    element: D::Node,
    name: &str,
) -> Option<String> {
    InlineStyle::from_element(tree, element)
        .get(name)
        .map(str::to_string)
}

pub fn set_style_property<D: ContentTree + ?Sized>(
    tree: &mut D,
    element: D::Node,
    name: &str,
    value: &str,
) {
    let mut style = InlineStyle::from_element(tree, element);
    style.set(name, value);
    style.write_to(tree, element);
}

/// Remove one property. Returns whether it was present.
pub fn remove_style_property<D: ContentTree + ?Sized>(
    tree: &mut D,
    element: D::Node,
    name: &str,
) -> bool {
    let mut style = InlineStyle::from_element(tree, element);
    let removed = style.remove(name);
    if removed {
        style.write_to(tree, element);
    }
    removed
}
