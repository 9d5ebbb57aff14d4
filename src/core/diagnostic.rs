use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a gesture produced no match record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// No coordinate was recorded (possibly a scroll)
    NoCoordinates,
    /// More than one coordinate was recorded (possibly a scroll)
    MultipleCoordinates,
    /// The hierarchy file is absent or could not be parsed
    MissingHierarchy,
    /// The hierarchy file has no usable root
    EmptyHierarchy,
    /// No leaf contains the gesture point
    NoMatch,
    /// The hierarchy broke an assumption while being searched
    TraversalError,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCoordinates => "no-coordinates",
            Self::MultipleCoordinates => "multiple-coordinates",
            Self::MissingHierarchy => "missing-hierarchy",
            Self::EmptyHierarchy => "empty-hierarchy",
            Self::NoMatch => "no-match",
            Self::TraversalError => "traversal-error",
        }
    }

    /// Rejected before any hierarchy was consulted.
    pub fn is_gesture_skip(&self) -> bool {
        matches!(self, Self::NoCoordinates | Self::MultipleCoordinates)
    }

    /// The gesture's hierarchy could not be used at all.
    pub fn is_hierarchy_skip(&self) -> bool {
        matches!(self, Self::MissingHierarchy | Self::EmptyHierarchy)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the append-only diagnostics log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub gesture_id: String,
    pub reason: SkipReason,
    /// Free-text detail, e.g. the underlying parse or traversal error
    pub detail: String,
    pub app: String,
    pub trace: String,
}

impl DiagnosticEntry {
    pub fn new(
        app: impl Into<String>,
        trace: impl Into<String>,
        gesture_id: impl Into<String>,
        reason: SkipReason,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            gesture_id: gesture_id.into(),
            reason,
            detail: detail.into(),
            app: app.into(),
            trace: trace.into(),
        }
    }
}
