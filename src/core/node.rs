//! Hierarchy node model.
//!
//! Hierarchy dumps carry ad hoc optional fields. Every field is kept as an
//! explicit `Option` (or a defaulted value) and read through an accessor
//! that states the default for the absent case.

use super::errors::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Class label used when a node carries none.
pub const UNKNOWN_CLASS: &str = "Unknown";

/// Axis-aligned rectangle in absolute pixel space, `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Truncates every edge toward zero, the way the hierarchy source compares them.
    pub fn truncated(&self) -> Self {
        Self::new(
            self.left.trunc(),
            self.top.trunc(),
            self.right.trunc(),
            self.bottom.trunc(),
        )
    }
}

impl From<[f64; 4]> for Bounds {
    fn from([left, top, right, bottom]: [f64; 4]) -> Self {
        Self::new(left, top, right, bottom)
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        [b.left, b.top, b.right, b.bottom]
    }
}

/// One element of a UI hierarchy. Parents own their children; there are
/// no back-references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Raw absolute bounds as found in the dump; see [`UiNode::bounds`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Vec<f64>>,

    /// Fractions of the parent rectangle; see [`UiNode::rel_bounds`].
    #[serde(
        default,
        rename = "rel-bounds",
        skip_serializing_if = "Option::is_none"
    )]
    pub rel_bounds: Option<Vec<f64>>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub clickable: bool,

    /// `null` entries are preserved as `None`.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<Option<UiNode>>,
}

impl UiNode {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    pub fn with_bounds(mut self, bounds: [f64; 4]) -> Self {
        self.bounds = Some(bounds.to_vec());
        self
    }

    pub fn with_rel_bounds(mut self, rel: [f64; 4]) -> Self {
        self.rel_bounds = Some(rel.to_vec());
        self
    }

    pub fn with_clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    pub fn with_child(mut self, child: UiNode) -> Self {
        self.children.push(Some(child));
        self
    }

    pub fn with_null_child(mut self) -> Self {
        self.children.push(None);
        self
    }

    /// Class label, `"Unknown"` when absent.
    pub fn class_name(&self) -> &str {
        self.class.as_deref().unwrap_or(UNKNOWN_CLASS)
    }

    /// Absolute bounds. Absent or empty → `Ok(None)`; exactly four values →
    /// `Ok(Some)`; anything else is malformed.
    pub fn bounds(&self) -> Result<Option<Bounds>> {
        match self.bounds.as_deref() {
            None | Some([]) => Ok(None),
            Some(&[l, t, r, b]) => Ok(Some(Bounds::new(l, t, r, b))),
            Some(other) => Err(Error::MalformedBounds {
                class: self.class_name().to_string(),
                found: other.len(),
            }),
        }
    }

    /// Relative bounds, present only when exactly four fractions were recorded.
    pub fn rel_bounds(&self) -> Option<[f64; 4]> {
        match self.rel_bounds.as_deref() {
            Some(&[l, t, r, b]) => Some([l, t, r, b]),
            _ => None,
        }
    }

    /// A node with no child entries at all. A node whose children are all
    /// `null` is not a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True for an object that carries nothing usable (`{}` in the dump).
    pub fn is_blank(&self) -> bool {
        self.class.is_none()
            && self.bounds.as_ref().is_none_or(Vec::is_empty)
            && self.rel_bounds.as_ref().is_none_or(Vec::is_empty)
            && self.children.is_empty()
    }

    /// Non-null children in document order.
    pub fn present_children(&self) -> impl Iterator<Item = &UiNode> {
        self.children.iter().flatten()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Option<UiNode>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Option<UiNode>>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `true`/`false`, their string spellings, and `null`.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

/// Top-level shape of a hierarchy file: `{ "activity": { "root": ... } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HierarchyDocument {
    #[serde(default)]
    pub activity: Option<Activity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub root: Option<UiNode>,
}

impl HierarchyDocument {
    /// The root node, or `None` when the document has no usable root.
    pub fn into_root(self) -> Option<UiNode> {
        self.activity
            .and_then(|a| a.root)
            .filter(|root| !root.is_blank())
    }
}
