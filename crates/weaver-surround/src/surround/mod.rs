//! Entry points: surround, unsurround and reformat a range.
//!
//! All three share one pipeline:
//!
//! 1. Validate the range against `base`.
//! 2. Pick the node to operate on: the farthest ancestor of the range's
//!    common ancestor that already carries the format, or the common
//!    ancestor itself.
//! 3. Split the boundary text nodes.
//! 4. Build the formatting forest without touching the tree.
//! 5. Run the planned removals and clears, then format the forest.
//!
//! Callback failures during steps 2 and 4 leave the tree as it was, apart
//! from the boundary text splits, which never change the content. A failing
//! formatter or clear callback in step 5 aborts with the tree partially
//! updated.

use crate::apply::{ApplyFormat, apply, execute_plan};
use crate::build::{BuildFormat, Builder};
use crate::content::{ContentTree, NodeType};
use crate::error::{Result, SurroundError};
use crate::find_above::try_find_farthest;
use crate::format::SurroundFormat;
use crate::match_type::bool_matcher;
use crate::range::DomRange;
use crate::split_text::split_partially_selected;


/// Put `format` on everything in `range`.
///
/// Existing matches touching the range are absorbed, and adjacent spans end
/// up under a single element where the format allows it. Returns the range
/// covering the formatted content.
pub fn surround<D: ContentTree, T>(
    tree: &mut D,
    range: &DomRange<D::Node>,
    base: D::Node,
    format: &SurroundFormat<D, T>,
) -> Result<DomRange<D::Node>> {
    surround_on_correct_node(
        tree,
        range,
        base,
        format,
        BuildFormat::Surround,
        ApplyFormat::Surround,
    )
}

/// Take `format` off everything in `range`, leaving content outside the
/// range formatted as before.
pub fn unsurround<D: ContentTree, T>(
    tree: &mut D,
    range: &DomRange<D::Node>,
    base: D::Node,
    format: &SurroundFormat<D, T>,
) -> Result<DomRange<D::Node>> {
    surround_on_correct_node(
        tree,
        range,
        base,
        format,
        BuildFormat::Unsurround,
        ApplyFormat::Unsurround,
    )
}

/// Re-apply `format` to the content in `range` that already carries it.
/// Unformatted content is left alone.
pub fn reformat<D: ContentTree, T>(
    tree: &mut D,
    range: &DomRange<D::Node>,
    base: D::Node,
    format: &SurroundFormat<D, T>,
) -> Result<DomRange<D::Node>> {
    surround_on_correct_node(
        tree,
        range,
        base,
        format,
        BuildFormat::Reformat,
        ApplyFormat::Reformat,
    )
}

fn surround_on_correct_node<D: ContentTree, T>(
    tree: &mut D,
    range: &DomRange<D::Node>,
    base: D::Node,
    format: &SurroundFormat<D, T>,
    build: BuildFormat,
    policy: ApplyFormat,
) -> Result<DomRange<D::Node>> {
    range.validate(tree, base)?;
    if range.is_collapsed() {
        tracing::debug!(target: "weaver::surround", ?build, "collapsed range, nothing to do");
        return Ok(*range);
    }

    let common = range
        .common_ancestor(tree)
        .ok_or_else(|| SurroundError::invalid_range("boundaries share no ancestor"))?;

    let farthest = try_find_farthest(tree, common, base, bool_matcher(format))?;

    let mut target = farthest.unwrap_or(common);
    if matches!(tree.node_type(target), NodeType::Text | NodeType::Comment) {
        target = tree.parent(target).unwrap_or(base);
    }

    let split = split_partially_selected(tree, range, base);
    let built = Builder::new(&*tree, format, build, base, split).run(target)?;

    tracing::debug!(
        target: "weaver::surround",
        ?build,
        root = ?target,
        forest = built.forest.len(),
        removals = built.plan.removals.len(),
        clears = built.plan.clears.len(),
        "built formatting forest"
    );

    execute_plan(tree, built.plan)?;
    let applied = apply(tree, &built.forest, policy, format)?;

    tracing::debug!(target: "weaver::surround", ?policy, applied, "applied format");
    Ok(built.split.to_dom_range(tree))
}
