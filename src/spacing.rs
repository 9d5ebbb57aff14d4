//! Directional spacing between a matched element and its surroundings.
//!
//! Each spacing starts as the distance to the matching parent edge and is
//! tightened by any sibling that sits strictly on that side and overlaps the
//! element on the perpendicular axis. Gaps are normalized by the parent
//! width (left/right) or height (top/bottom).

use crate::core::{Bounds, Spacing, UiNode};

/// Computes the four spacings for `element`.
///
/// Without a parent every spacing is infinite. A parent axis with zero
/// extent cannot normalize a gap, so both spacings on that axis stay
/// infinite and siblings are not consulted for it. Siblings without usable
/// bounds are ignored.
pub fn calculate_spacing(element: &Bounds, parent: Option<&Bounds>, siblings: &[&UiNode]) -> Spacing {
    let Some(parent) = parent else {
        return Spacing::UNBOUNDED;
    };

    let width = parent.width();
    let height = parent.height();
    let horizontal = width != 0.0;
    let vertical = height != 0.0;

    let mut spacing = Spacing::UNBOUNDED;
    if vertical {
        spacing.top = (element.top - parent.top) / height;
        spacing.bottom = (parent.bottom - element.bottom) / height;
    }
    if horizontal {
        spacing.left = (element.left - parent.left) / width;
        spacing.right = (parent.right - element.right) / width;
    }

    for sibling in siblings.iter().filter_map(|s| s.bounds().ok().flatten()) {
        let overlaps_vertically = sibling.bottom > element.top && sibling.top < element.bottom;
        let overlaps_horizontally = sibling.right > element.left && sibling.left < element.right;

        if vertical && overlaps_horizontally {
            if sibling.bottom < element.top {
                spacing.top = spacing.top.min((element.top - sibling.bottom) / height);
            }
            if sibling.top > element.bottom {
                spacing.bottom = spacing.bottom.min((sibling.top - element.bottom) / height);
            }
        }

        if horizontal && overlaps_vertically {
            if sibling.right < element.left {
                spacing.left = spacing.left.min((element.left - sibling.right) / width);
            }
            if sibling.left > element.right {
                spacing.right = spacing.right.min((sibling.left - element.right) / width);
            }
        }
    }

    spacing
}
