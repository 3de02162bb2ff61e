//! Matcher verdicts.
//!
//! A matcher looks at one element and answers with a `MatchType`. The
//! verdict is a plain value: any side effect a `Clear` needs is carried as a
//! closure and only runs once the mutation step executes the plan.

use crate::content::ContentTree;
use crate::error::{BoxError, CallbackKind, Result, SurroundError};
use crate::format::SurroundFormat;

/// Side effect that strips the matched styling from an element while
/// keeping the element itself.
pub type ClearFn<D> =
    Box<dyn FnOnce(&mut D, <D as ContentTree>::Node) -> Result<(), BoxError>>;

/// What a matcher decided about one element.
pub enum MatchType<D: ContentTree, T> {
    /// The element does not carry the format.
    None,
    /// The element carries nothing but the format and can be unwrapped.
    Remove { cache: Option<T> },
    /// The element carries the format among other things. It stays, and
    /// `clear` removes the format from it.
    Clear { cache: Option<T>, clear: ClearFn<D> },
}

impl<D: ContentTree, T> MatchType<D, T> {
    pub fn remove() -> Self {
        MatchType::Remove { cache: None }
    }

    pub fn remove_with(cache: T) -> Self {
        MatchType::Remove {
            cache: Some(cache),
        }
    }

    pub fn clear(
        clear: impl FnOnce(&mut D, D::Node) -> Result<(), BoxError> + 'static,
    ) -> Self {
        MatchType::Clear {
            cache: None,
            clear: Box::new(clear),
        }
    }

    pub fn clear_with(
        cache: T,
        clear: impl FnOnce(&mut D, D::Node) -> Result<(), BoxError> + 'static,
    ) -> Self {
        MatchType::Clear {
            cache: Some(cache),
            clear: Box::new(clear),
        }
    }

    pub fn matches(&self) -> bool {
        !matches!(self, MatchType::None)
    }

    pub fn cache(&self) -> Option<&T> {
        match self {
            MatchType::None => None,
            MatchType::Remove { cache } | MatchType::Clear { cache, .. } => cache.as_ref(),
        }
    }
}

impl<D: ContentTree, T: std::fmt::Debug> std::fmt::Debug for MatchType<D, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::None => f.write_str("None"),
            MatchType::Remove { cache } => f.debug_struct("Remove").field("cache", cache).finish(),
            MatchType::Clear { cache, .. } => f
                .debug_struct("Clear")
                .field("cache", cache)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    Remove,
    Clear,
}

/// A positive verdict recorded during the build, attached to the
/// formatting nodes it affects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match<N, T> {
    element: N,
    kind: MatchKind,
    cache: Option<T>,
}

impl<N: Copy, T> Match<N, T> {
    pub(crate) fn new(element: N, kind: MatchKind, cache: Option<T>) -> Self {
        Self {
            element,
            kind,
            cache,
        }
    }

    /// The matched element. Removed elements are detached by the time
    /// formatters run.
    pub fn element(&self) -> N {
        self.element
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn should_remove(&self) -> bool {
        self.kind == MatchKind::Remove
    }

    pub fn cache(&self) -> Option<&T> {
        self.cache.as_ref()
    }
}

/// Adapt a format's matcher into a yes/no predicate for ancestor searches.
///
/// Callback errors are reported as `SurroundError::Matcher`.
pub fn bool_matcher<D: ContentTree, T>(
    format: &SurroundFormat<D, T>,
) -> impl Fn(&D, D::Node) -> Result<bool> {
    move |tree: &D, node: D::Node| {
        format
            .classify(tree, node)
            .map(|verdict| verdict.matches())
            .map_err(SurroundError::callback(CallbackKind::Matcher))
    }
}
