//! Surround format configuration.
//!
//! A format tells the engine which elements already carry it (`matcher`)
//! and how to put it on a span: either by wrapping the span in a fresh copy
//! of `surround_element`, or by handing the span to a `formatter`.

use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::content::ContentTree;
use crate::error::BoxError;
use crate::match_type::MatchType;
use crate::tree::FormattingNode;

/// Classifies one element.
pub type Matcher<D, T> =
    Rc<dyn Fn(&D, <D as ContentTree>::Node) -> Result<MatchType<D, T>, BoxError>>;

/// Applies the format to one formatting node in place. Returns whether it
/// changed anything.
pub type Formatter<D, T> =
    Rc<dyn Fn(&mut D, &FormattingNode<<D as ContentTree>::Node, T>) -> Result<bool, BoxError>>;

/// Decides whether two adjacent formatting nodes may become one.
pub type Merger<D, T> = Rc<
    dyn Fn(
        &D,
        &FormattingNode<<D as ContentTree>::Node, T>,
        &FormattingNode<<D as ContentTree>::Node, T>,
    ) -> Result<bool, BoxError>,
>;

/// Tag and attributes of the element a format wraps spans in.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementTemplate {
    tag: SmolStr,
    attributes: Vec<(SmolStr, String)>,
}

impl ElementTemplate {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[(SmolStr, String)] {
        &self.attributes
    }

    /// Create a detached element from this template.
    pub fn instantiate<D: ContentTree + ?Sized>(&self, tree: &mut D) -> D::Node {
        let element = tree.create_element(&self.tag);
        for (name, value) in &self.attributes {
            tree.set_attribute(element, name, value);
        }
        element
    }
}

/// Everything the engine needs to know about one format.
pub struct SurroundFormat<D: ContentTree, T> {
    matcher: Matcher<D, T>,
    surround_element: Option<ElementTemplate>,
    formatter: Option<Formatter<D, T>>,
    merger: Option<Merger<D, T>>,
}

impl<D: ContentTree, T> SurroundFormat<D, T> {
    pub fn new(
        matcher: impl Fn(&D, D::Node) -> Result<MatchType<D, T>, BoxError> + 'static,
    ) -> Self {
        Self {
            matcher: Rc::new(matcher),
            surround_element: None,
            formatter: None,
            merger: None,
        }
    }

    /// Format by wrapping each span in a copy of `template`.
    pub fn with_surround_element(mut self, template: ElementTemplate) -> Self {
        self.surround_element = Some(template);
        self
    }

    /// Format by calling `formatter` on each span. Takes effect only when
    /// no surround element is set.
    pub fn with_formatter(
        mut self,
        formatter: impl Fn(&mut D, &FormattingNode<D::Node, T>) -> Result<bool, BoxError> + 'static,
    ) -> Self {
        self.formatter = Some(Rc::new(formatter));
        self
    }

    /// Restrict which adjacent spans may merge. Without a merger every pair
    /// the operation allows is merged.
    pub fn with_merger(
        mut self,
        merger: impl Fn(
            &D,
            &FormattingNode<D::Node, T>,
            &FormattingNode<D::Node, T>,
        ) -> Result<bool, BoxError>
        + 'static,
    ) -> Self {
        self.merger = Some(Rc::new(merger));
        self
    }

    pub fn matcher(&self) -> Matcher<D, T> {
        Rc::clone(&self.matcher)
    }

    pub fn surround_element(&self) -> Option<&ElementTemplate> {
        self.surround_element.as_ref()
    }

    pub fn formatter(&self) -> Option<&Formatter<D, T>> {
        self.formatter.as_ref()
    }

    pub fn merger(&self) -> Option<&Merger<D, T>> {
        self.merger.as_ref()
    }

    pub(crate) fn classify(&self, tree: &D, node: D::Node) -> Result<MatchType<D, T>, BoxError> {
        (self.matcher)(tree, node)
    }
}

impl<D: ContentTree, T> Clone for SurroundFormat<D, T> {
    fn clone(&self) -> Self {
        Self {
            matcher: Rc::clone(&self.matcher),
            surround_element: self.surround_element.clone(),
            formatter: self.formatter.clone(),
            merger: self.merger.clone(),
        }
    }
}

impl<D: ContentTree, T> fmt::Debug for SurroundFormat<D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurroundFormat")
            .field("surround_element", &self.surround_element)
            .field("formatter", &self.formatter.is_some())
            .field("merger", &self.merger.is_some())
            .finish_non_exhaustive()
    }
}
