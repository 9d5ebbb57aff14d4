//! Durable output of a successful match.

use super::node::Bounds;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Normalized gap to the nearest parent edge or sibling in each direction.
///
/// `f64::INFINITY` means no bounding edge was found (no parent). JSON has no
/// infinity literal, so it is written as the string `"Infinity"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    #[serde(with = "unbounded")]
    pub top: f64,
    #[serde(with = "unbounded")]
    pub bottom: f64,
    #[serde(with = "unbounded")]
    pub left: f64,
    #[serde(with = "unbounded")]
    pub right: f64,
}

impl Spacing {
    pub const UNBOUNDED: Self = Self {
        top: f64::INFINITY,
        bottom: f64::INFINITY,
        left: f64::INFINITY,
        right: f64::INFINITY,
    };

    pub fn is_unbounded(&self) -> bool {
        [self.top, self.bottom, self.left, self.right]
            .iter()
            .all(|v| v.is_infinite())
    }
}

mod unbounded {
    use super::*;

    const INFINITY: &str = "Infinity";

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() && value.is_sign_positive() {
            serializer.serialize_str(INFINITY)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) if s == INFINITY => Ok(f64::INFINITY),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "expected number or \"{INFINITY}\", found \"{s}\""
            ))),
        }
    }
}

/// Structural description of the element a gesture struck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    /// The element's own absolute bounds, `null` when it only had rel-bounds
    pub bounds: Option<Bounds>,
    pub class: String,
    pub clickable: bool,
    /// Root-first class chain, ending with the element itself
    pub ancestors: Vec<String>,
    pub ancestors_count: usize,
    /// Parent's other children, in document order
    pub siblings: Vec<String>,
    pub siblings_count: usize,
    pub parent_children_count: usize,
    pub parent_children_classes: Vec<String>,
    /// Height of the whole tree
    pub hierarchy_depth: usize,
    /// Depth of the element below the root
    pub nesting_level: usize,
    pub spacing: Spacing,
    pub total_components_in_ui: usize,
    /// Descendants of the element's parent
    pub descendant_count: usize,
    pub descendant_classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Gesture id, which is also the UI (hierarchy file) id
    pub ui: String,
    /// Absolute gesture coordinate
    pub gesture: [f64; 2],
    pub component: ComponentInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_spacing_serializes_as_string() {
        let json = serde_json::to_value(Spacing::UNBOUNDED).unwrap();
        assert_eq!(json["top"], "Infinity");

        let back: Spacing = serde_json::from_value(json).unwrap();
        assert!(back.is_unbounded());
    }

    #[test]
    fn test_finite_spacing_roundtrips_as_number() {
        let spacing = Spacing {
            top: 0.25,
            bottom: 0.5,
            left: 0.0,
            right: 1.0,
        };
        let json = serde_json::to_value(spacing).unwrap();
        assert_eq!(json["top"], 0.25);
        assert!(!spacing.is_unbounded());
    }

    #[test]
    fn test_unknown_spacing_text_rejected() {
        let err = serde_json::from_str::<Spacing>(
            r#"{"top": "NaN", "bottom": 0, "left": 0, "right": 0}"#,
        );
        assert!(err.is_err());
    }
}
