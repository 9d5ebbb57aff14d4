//! Recursive measurements over a hierarchy subtree.
//!
//! `null` child entries add no depth and no descendants, but each one still
//! counts as a component.

use crate::core::{Error, Result, UiNode};

/// Height of the subtree rooted at `node`: 1 for a leaf, otherwise one more
/// than the tallest child. An absent node counts as 1.
pub fn hierarchy_depth(node: Option<&UiNode>) -> usize {
    node.map_or(1, |n| {
        1 + n
            .present_children()
            .map(|child| hierarchy_depth(Some(child)))
            .max()
            .unwrap_or(0)
    })
}

/// The node itself plus every descendant. A `null` child entry counts as
/// one component.
pub fn count_components(node: &UiNode) -> usize {
    1 + node
        .children
        .iter()
        .map(|child| child.as_ref().map_or(1, count_components))
        .sum::<usize>()
}

/// Number and class labels of every descendant of `node` (excluding the
/// node itself), in depth-first pre-order.
pub fn descendants_of(node: &UiNode) -> (usize, Vec<String>) {
    fn visit(node: &UiNode, classes: &mut Vec<String>) {
        for child in node.present_children() {
            classes.push(child.class_name().to_string());
            visit(child, classes);
        }
    }

    let mut classes = Vec::new();
    visit(node, &mut classes);
    (classes.len(), classes)
}

/// Number and class labels of the direct children of `node`.
///
/// A `null` entry here means the parent context of a match cannot be
/// described, which is reported as a traversal error.
pub fn direct_children(node: &UiNode) -> Result<(usize, Vec<String>)> {
    let classes = node
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            child
                .as_ref()
                .map(|c| c.class_name().to_string())
                .ok_or_else(|| {
                    Error::traversal(format!(
                        "null child at index {index} under {}",
                        node.class_name()
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((classes.len(), classes))
}
