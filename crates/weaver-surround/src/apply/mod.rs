//! Apply phase: run the plan, then format the forest.

mod format;

pub use format::ApplyFormat;

use self::format::apply_format;
use crate::build::Plan;
use crate::content::ContentTree;
use crate::error::{CallbackKind, Result, SurroundError};
use crate::format::SurroundFormat;
use crate::tree::TreeNode;

/// Carry out the structural decisions of the build phase. Afterwards the
/// tree has exactly the shape the forest's ranges were computed against.
pub(crate) fn execute_plan<D: ContentTree>(tree: &mut D, plan: Plan<D>) -> Result<()> {
    for element in plan.removals {
        tree.unwrap(element);
    }
    for (element, clear) in plan.clears {
        clear(tree, element).map_err(SurroundError::callback(CallbackKind::Clear))?;
    }
    Ok(())
}

/// Format every node `policy` selects. Returns how many nodes changed the
/// tree.
///
/// Children go before their parents and later siblings before earlier ones,
/// so a wrap never shifts a range that is still waiting to be applied.
pub(crate) fn apply<D: ContentTree, T>(
    tree: &mut D,
    forest: &[TreeNode<D::Node, T>],
    policy: ApplyFormat,
    format: &SurroundFormat<D, T>,
) -> Result<usize> {
    let mut applied = 0;
    for node in forest.iter().rev() {
        applied += apply_node(tree, node, policy, format)?;
    }
    Ok(applied)
}

fn apply_node<D: ContentTree, T>(
    tree: &mut D,
    node: &TreeNode<D::Node, T>,
    policy: ApplyFormat,
    format: &SurroundFormat<D, T>,
) -> Result<usize> {
    let mut applied = apply(tree, node.children(), policy, format)?;

    if let TreeNode::Formatting(node) = node {
        if policy.should_apply(node) && apply_format(tree, node, format)? {
            tracing::trace!(
                target: "weaver::surround",
                parent = ?node.range().parent(),
                start = node.range().start_index(),
                end = node.range().end_index(),
                "applied format"
            );
            applied += 1;
        }
    }
    Ok(applied)
}
