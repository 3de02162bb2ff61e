//! Ancestor search bounded by a base element.

use std::convert::Infallible;

use crate::content::ContentTree;

/// Closest element at or above `node` that satisfies `matcher`, stopping
/// before `base`.
pub fn find_closest<D: ContentTree + ?Sized>(
    tree: &D,
    node: D::Node,
    base: D::Node,
    mut matcher: impl FnMut(&D, D::Node) -> bool,
) -> Option<D::Node> {
    let result: Result<_, Infallible> =
        try_find_closest(tree, node, base, |tree, node| Ok(matcher(tree, node)));
    result.unwrap_or_else(|never| match never {})
}

/// Farthest element at or above `node` that satisfies `matcher`, stopping
/// before `base`.
pub fn find_farthest<D: ContentTree + ?Sized>(
    tree: &D,
    node: D::Node,
    base: D::Node,
    mut matcher: impl FnMut(&D, D::Node) -> bool,
) -> Option<D::Node> {
    let result: Result<_, Infallible> =
        try_find_farthest(tree, node, base, |tree, node| Ok(matcher(tree, node)));
    result.unwrap_or_else(|never| match never {})
}

pub fn try_find_closest<D: ContentTree + ?Sized, E>(
    tree: &D,
    node: D::Node,
    base: D::Node,
    mut matcher: impl FnMut(&D, D::Node) -> Result<bool, E>,
) -> Result<Option<D::Node>, E> {
    for current in ancestors_within(tree, node, base) {
        if tree.is_element(current) && matcher(tree, current)? {
            return Ok(Some(current));
        }
    }
    Ok(None)
}

pub fn try_find_farthest<D: ContentTree + ?Sized, E>(
    tree: &D,
    node: D::Node,
    base: D::Node,
    mut matcher: impl FnMut(&D, D::Node) -> Result<bool, E>,
) -> Result<Option<D::Node>, E> {
    let mut farthest = None;
    for current in ancestors_within(tree, node, base) {
        if tree.is_element(current) && matcher(tree, current)? {
            farthest = Some(current);
        }
    }
    Ok(farthest)
}

/// `node` and its ancestors below `base`. Empty when `node` is not inside
/// `base`.
fn ancestors_within<D: ContentTree + ?Sized>(
    tree: &D,
    node: D::Node,
    base: D::Node,
) -> Vec<D::Node> {
    let mut chain = Vec::new();
    let mut current = Some(node);
    while let Some(n) = current {
        if n == base {
            return chain;
        }
        chain.push(n);
        current = tree.parent(n);
    }
    Vec::new()
}
