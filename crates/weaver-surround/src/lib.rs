//! weaver-surround: Range formatting for rich-text content trees.
//!
//! This crate provides:
//! - `ContentTree` trait: the minimal DOM interface the engine works against
//! - `Document` - arena-backed implementation with an HTML fragment parser
//! - `surround` / `unsurround` / `reformat` over a `DomRange`, normalizing
//!   existing formatting instead of stacking new elements on top of it
//! - `SurroundFormat` - matcher, wrapper element, formatter and merger of a format
//! - `formats` - bold, italic, underline, sub/superscript and colors
//! - `Surrounder` - named format registry with toggle semantics

pub mod content;
pub mod document;
pub mod error;
pub mod find_above;
pub mod flat_range;
pub mod format;
pub mod formats;
pub mod html;
pub mod match_type;
pub mod range;
pub mod split_text;
pub mod style;
pub mod surrounder;
pub mod tree;

mod apply;
mod build;
mod surround;
mod view;

pub use apply::ApplyFormat;
pub use build::BuildFormat;
pub use content::{BLOCK_ELEMENTS, ContentTree, NodeType};
pub use document::{Document, NodeData, NodeId};
pub use error::{BoxError, CallbackKind, Result, SurroundError};
pub use find_above::{find_closest, find_farthest};
pub use flat_range::FlatRange;
pub use format::{ElementTemplate, SurroundFormat};
pub use match_type::{Match, MatchKind, MatchType, bool_matcher};
pub use range::{Boundary, DomRange};
pub use smol_str::SmolStr;
pub use split_text::{SplitRange, split_partially_selected};
pub use surround::{reformat, surround, unsurround};
pub use surrounder::Surrounder;
pub use tree::{BlockNode, ElementNode, FormattingNode, TreeNode};
