//! Gestures and the reference resolution used to place them on screen.

use super::diagnostic::SkipReason;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Screen size the normalized gesture coordinates are scaled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceResolution {
    pub width: u32,
    pub height: u32,
}

impl Default for ReferenceResolution {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 2560,
        }
    }
}

impl ReferenceResolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Maps a normalized `(x, y)` into absolute pixel space.
    pub fn to_absolute(&self, [x, y]: [f64; 2]) -> [f64; 2] {
        [x * f64::from(self.width), y * f64::from(self.height)]
    }
}

/// A pointer-down event as recorded in `gestures.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    /// Also the stem of the hierarchy file captured with it.
    pub id: String,
    pub coordinates: Vec<[f64; 2]>,
}

impl Gesture {
    pub fn new(id: impl Into<String>, coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            id: id.into(),
            coordinates,
        }
    }

    /// The gesture's only coordinate. Zero or several coordinates (usually
    /// scrolls) are rejected rather than guessed.
    pub fn single_point(&self) -> Result<[f64; 2], SkipReason> {
        match self.coordinates.as_slice() {
            [point] => Ok(*point),
            [] => Err(SkipReason::NoCoordinates),
            _ => Err(SkipReason::MultipleCoordinates),
        }
    }
}

/// Contents of one `gestures.json`, keyed and iterated in id order.
///
/// A `null` coordinate list is read as empty, so that gesture alone is
/// skipped as having no coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureSet {
    entries: BTreeMap<String, Vec<[f64; 2]>>,
}

impl<'de> Deserialize<'de> for GestureSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<Vec<[f64; 2]>>>::deserialize(deserializer)?;
        Ok(Self {
            entries: raw
                .into_iter()
                .map(|(id, coordinates)| (id, coordinates.unwrap_or_default()))
                .collect(),
        })
    }
}

impl GestureSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, id: impl Into<String>, coordinates: Vec<[f64; 2]>) {
        self.entries.insert(id.into(), coordinates);
    }

    pub fn iter(&self) -> impl Iterator<Item = Gesture> + '_ {
        self.entries
            .iter()
            .map(|(id, coords)| Gesture::new(id.clone(), coords.clone()))
    }
}

impl FromIterator<Gesture> for GestureSet {
    fn from_iter<I: IntoIterator<Item = Gesture>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|g| (g.id, g.coordinates)).collect(),
        }
    }
}
