//! Point containment tests against absolute and parent-relative rectangles.

use crate::core::Bounds;

/// Inclusive containment. Edges are truncated to integers first, matching
/// how the hierarchy source compares them.
pub fn point_in_bounds(x: f64, y: f64, bounds: &Bounds) -> bool {
    let b = bounds.truncated();
    b.left <= x && x <= b.right && b.top <= y && y <= b.bottom
}

/// Maps a parent-relative rectangle into the parent's absolute space.
pub fn absolute_from_relative(rel: [f64; 4], parent: &Bounds) -> Bounds {
    let parent = parent.truncated();
    let (width, height) = (parent.width(), parent.height());
    Bounds::new(
        parent.left + width * rel[0],
        parent.top + height * rel[1],
        parent.left + width * rel[2],
        parent.top + height * rel[3],
    )
}

/// Containment against relative bounds. False without a parent rectangle or
/// without exactly four fractions.
pub fn point_in_relative_bounds(
    x: f64,
    y: f64,
    rel_bounds: Option<&[f64]>,
    parent_bounds: Option<&Bounds>,
) -> bool {
    match (rel_bounds, parent_bounds) {
        (Some(&[l, t, r, b]), Some(parent)) => {
            point_in_bounds(x, y, &absolute_from_relative([l, t, r, b], parent))
        }
        _ => false,
    }
}
