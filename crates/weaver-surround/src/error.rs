//! Error types for surround operations.

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Error type returned by caller-supplied callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = SurroundError> = std::result::Result<T, E>;

/// Which caller-supplied callback failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Matcher,
    Merger,
    Formatter,
    Clear,
}

impl std::fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CallbackKind::Matcher => "matcher",
            CallbackKind::Merger => "merger",
            CallbackKind::Formatter => "formatter",
            CallbackKind::Clear => "clear",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum SurroundError {
    /// The range is not usable against the given base element.
    #[error("invalid range: {reason}")]
    #[diagnostic(code(weaver::surround::invalid_range))]
    InvalidRange { reason: SmolStr },

    /// A caller-supplied callback failed. Propagated as-is, never swallowed.
    #[error("{kind} callback failed")]
    #[diagnostic(
        code(weaver::surround::callback),
        help("callbacks belong to the format; this usually points at a bug in its definition")
    )]
    Matcher {
        kind: CallbackKind,
        #[source]
        source: BoxError,
    },

    /// No format is registered under this name.
    #[error("no surround format registered as {0:?}")]
    #[diagnostic(code(weaver::surround::unknown_format))]
    UnknownFormat(SmolStr),
}

impl SurroundError {
    pub(crate) fn invalid_range(reason: impl Into<SmolStr>) -> Self {
        SurroundError::InvalidRange {
            reason: reason.into(),
        }
    }

    pub(crate) fn callback(kind: CallbackKind) -> impl FnOnce(BoxError) -> Self {
        move |source| SurroundError::Matcher { kind, source }
    }
}
