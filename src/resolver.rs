//! Gesture-to-component resolution.
//!
//! A depth-first, pre-order descent from the hierarchy root collects every
//! leaf whose rectangle contains the gesture point. A node that fails both
//! the absolute and the parent-relative containment test prunes its whole
//! subtree. The most specific candidate, largest
//! `(hierarchy_depth, nesting_level)`, is the resolved element.
//!
//! The parent of the node being visited is carried down the recursion as a
//! value; nodes hold no back-references.

use crate::core::{Bounds, Result, UiNode};
use crate::geometry::{absolute_from_relative, point_in_bounds, point_in_relative_bounds};
use crate::metrics::{direct_children, hierarchy_depth};
use std::cell::OnceCell;

/// A leaf that contains the gesture point, with the context captured when
/// it was discovered.
#[derive(Debug, Clone)]
pub struct MatchCandidate<'a> {
    pub node: &'a UiNode,
    pub parent: Option<&'a UiNode>,
    /// Position of `node` within `parent.children`
    pub index_in_parent: usize,
    /// Root-first class chain, ending with the node itself
    pub ancestors: Vec<String>,
    pub nesting_level: usize,
    /// Height of the parent's subtree (1 when the node is the root)
    pub hierarchy_depth: usize,
    pub sibling_classes: Vec<String>,
    pub parent_children_count: usize,
    pub parent_children_classes: Vec<String>,
}

impl<'a> MatchCandidate<'a> {
    /// Ranking key: deeper parent subtree first, then deeper nesting.
    pub fn specificity(&self) -> (usize, usize) {
        (self.hierarchy_depth, self.nesting_level)
    }

    pub fn sibling_count(&self) -> usize {
        self.sibling_classes.len()
    }

    /// The parent's other children, in document order.
    pub fn siblings(&self) -> Vec<&'a UiNode> {
        self.parent
            .map(|p| {
                p.children
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != self.index_in_parent)
                    .filter_map(|(_, c)| c.as_ref())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The parent's absolute bounds, if usable.
    pub fn parent_bounds(&self) -> Option<Bounds> {
        self.parent.and_then(|p| p.bounds().ok().flatten())
    }

    /// The element's own bounds, or its rel-bounds mapped into the parent.
    pub fn effective_bounds(&self) -> Result<Option<Bounds>> {
        if let Some(bounds) = self.node.bounds()? {
            return Ok(Some(bounds));
        }
        Ok(self
            .node
            .rel_bounds()
            .zip(self.parent_bounds())
            .map(|(rel, parent)| absolute_from_relative(rel, &parent)))
    }
}

struct Visit<'a, 'p> {
    node: &'a UiNode,
    parent: Option<&'p ParentContext<'a>>,
    index_in_parent: usize,
    depth: usize,
}

/// A containing node whose children are being searched.
struct ParentContext<'a> {
    node: &'a UiNode,
    summary: OnceCell<ParentSummary>,
}

/// Measurements shared by every candidate under one parent.
struct ParentSummary {
    hierarchy_depth: usize,
    children_classes: Vec<String>,
}

impl<'a> ParentContext<'a> {
    fn new(node: &'a UiNode) -> Self {
        Self {
            node,
            summary: OnceCell::new(),
        }
    }

    /// Computed on the first matching child only; later candidates reuse it.
    fn summary(&self) -> Result<&ParentSummary> {
        if let Some(summary) = self.summary.get() {
            return Ok(summary);
        }
        let (_, children_classes) = direct_children(self.node)?;
        Ok(self.summary.get_or_init(|| ParentSummary {
            hierarchy_depth: hierarchy_depth(Some(self.node)),
            children_classes,
        }))
    }
}

/// Collects every containing leaf in traversal order.
///
/// Fails when a node on the searched path has malformed bounds, or when the
/// matched leaf's parent has a `null` child.
pub fn find_candidates(root: &UiNode, x: f64, y: f64) -> Result<Vec<MatchCandidate<'_>>> {
    let mut found = Vec::new();
    let mut ancestors = Vec::new();
    search(
        Visit {
            node: root,
            parent: None,
            index_in_parent: 0,
            depth: 0,
        },
        x,
        y,
        &mut ancestors,
        &mut found,
    )?;
    Ok(found)
}

fn search<'a>(
    visit: Visit<'a, '_>,
    x: f64,
    y: f64,
    ancestors: &mut Vec<String>,
    found: &mut Vec<MatchCandidate<'a>>,
) -> Result<()> {
    let Visit {
        node,
        parent,
        index_in_parent,
        depth,
    } = visit;

    if !contains(node, parent.map(|p| p.node), x, y)? {
        return Ok(());
    }

    ancestors.push(node.class_name().to_string());

    let outcome = if node.is_leaf() {
        candidate(node, parent, index_in_parent, depth, ancestors).map(|c| found.push(c))
    } else {
        let context = ParentContext::new(node);
        node.children
            .iter()
            .enumerate()
            .filter_map(|(i, child)| child.as_ref().map(|c| (i, c)))
            .try_for_each(|(i, child)| {
                search(
                    Visit {
                        node: child,
                        parent: Some(&context),
                        index_in_parent: i,
                        depth: depth + 1,
                    },
                    x,
                    y,
                    ancestors,
                    found,
                )
            })
    };

    ancestors.pop();
    outcome
}

fn contains(node: &UiNode, parent: Option<&UiNode>, x: f64, y: f64) -> Result<bool> {
    if let Some(bounds) = node.bounds()? {
        if point_in_bounds(x, y, &bounds) {
            return Ok(true);
        }
    }
    let parent_bounds = match parent {
        Some(p) => p.bounds()?,
        None => None,
    };
    Ok(point_in_relative_bounds(
        x,
        y,
        node.rel_bounds.as_deref(),
        parent_bounds.as_ref(),
    ))
}

fn candidate<'a>(
    node: &'a UiNode,
    parent: Option<&ParentContext<'a>>,
    index_in_parent: usize,
    depth: usize,
    ancestors: &[String],
) -> Result<MatchCandidate<'a>> {
    let Some(parent) = parent else {
        return Ok(MatchCandidate {
            node,
            parent: None,
            index_in_parent,
            ancestors: ancestors.to_vec(),
            nesting_level: depth,
            hierarchy_depth: hierarchy_depth(None),
            sibling_classes: Vec::new(),
            parent_children_count: 0,
            parent_children_classes: Vec::new(),
        });
    };

    let summary = parent.summary()?;
    let sibling_classes = summary
        .children_classes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index_in_parent)
        .map(|(_, class)| class.clone())
        .collect();

    Ok(MatchCandidate {
        node,
        parent: Some(parent.node),
        index_in_parent,
        ancestors: ancestors.to_vec(),
        nesting_level: depth,
        hierarchy_depth: summary.hierarchy_depth,
        sibling_classes,
        parent_children_count: summary.children_classes.len(),
        parent_children_classes: summary.children_classes.clone(),
    })
}

/// Picks the most specific candidate. Exact ties go to the candidate
/// discovered last in document order.
pub fn select_best<'a>(candidates: Vec<MatchCandidate<'a>>) -> Option<MatchCandidate<'a>> {
    candidates.into_iter().max_by_key(MatchCandidate::specificity)
}

/// Resolves the element struck at absolute `(x, y)`, if any.
pub fn resolve(root: &UiNode, x: f64, y: f64) -> Result<Option<MatchCandidate<'_>>> {
    find_candidates(root, x, y).map(select_best)
}
