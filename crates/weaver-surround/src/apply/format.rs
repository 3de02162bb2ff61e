use crate::content::ContentTree;
use crate::error::{CallbackKind, Result, SurroundError};
use crate::format::SurroundFormat;
use crate::tree::FormattingNode;

/// Which formatting nodes an operation touches in the apply phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyFormat {
    /// Every node.
    Surround,
    /// Only nodes outside the selection. Selected content already lost its
    /// matches during the build; what is left outside gets them back.
    Unsurround,
    /// Only nodes some existing match applies to.
    Reformat,
}

impl ApplyFormat {
    pub fn should_apply<N, T>(self, node: &FormattingNode<N, T>) -> bool {
        match self {
            ApplyFormat::Surround => true,
            ApplyFormat::Unsurround => !node.inside_range(),
            ApplyFormat::Reformat => node.has_match(),
        }
    }
}

/// Put `format` on the span of `node`. Returns whether the tree changed.
pub(crate) fn apply_format<D: ContentTree, T>(
    tree: &mut D,
    node: &FormattingNode<D::Node, T>,
    format: &SurroundFormat<D, T>,
) -> Result<bool> {
    if let Some(template) = format.surround_element() {
        let range = node.range();
        if range.is_empty() {
            return Ok(false);
        }
        let wrapper = template.instantiate(tree);
        tree.wrap_children(
            range.parent(),
            range.start_index()..range.end_index(),
            wrapper,
        );
        return Ok(true);
    }

    match format.formatter() {
        Some(formatter) => {
            formatter(tree, node).map_err(SurroundError::callback(CallbackKind::Formatter))
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat_range::FlatRange;

    #[test]
    fn test_should_apply() {
        let inside = FormattingNode::<u32, ()>::new(FlatRange::at(0, 0), true, Vec::new());
        let outside = FormattingNode::<u32, ()>::new(FlatRange::at(0, 1), false, Vec::new());

        assert!(ApplyFormat::Surround.should_apply(&inside));
        assert!(!ApplyFormat::Unsurround.should_apply(&inside));
        assert!(ApplyFormat::Unsurround.should_apply(&outside));
        assert!(!ApplyFormat::Reformat.should_apply(&inside));
    }
}
