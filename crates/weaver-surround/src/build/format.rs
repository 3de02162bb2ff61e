use crate::tree::FormattingNode;

/// Merge policy of the build phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildFormat {
    /// Merge any adjacent spans.
    Surround,
    /// Never merge selected content with unselected content.
    Unsurround,
    /// Never merge matched content with unmatched content.
    Reformat,
}

impl BuildFormat {
    /// Whether the operation allows `before` and `after` to merge. The
    /// format's merger gets the final say.
    pub fn allows_merge<N, T>(
        self,
        before: &FormattingNode<N, T>,
        after: &FormattingNode<N, T>,
    ) -> bool {
        match self {
            BuildFormat::Surround => true,
            BuildFormat::Unsurround => before.inside_range() == after.inside_range(),
            BuildFormat::Reformat => before.has_match() == after.has_match(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::flat_range::FlatRange;
    use crate::match_type::{Match, MatchKind};

    type Node = FormattingNode<u32, ()>;

    #[test]
    fn test_policies() {
        let inside = Node::new(FlatRange::at(0, 0), true, Vec::new());
        let matched = Node::new(
            FlatRange::at(0, 1),
            false,
            vec![Rc::new(Match::new(7, MatchKind::Remove, None))],
        );

        assert!(BuildFormat::Surround.allows_merge(&inside, &matched));
        assert!(!BuildFormat::Unsurround.allows_merge(&inside, &matched));
        assert!(!BuildFormat::Reformat.allows_merge(&inside, &matched));
        assert!(BuildFormat::Reformat.allows_merge(&inside, &inside));
    }
}
