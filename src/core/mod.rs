pub mod diagnostic;
pub mod errors;
pub mod gesture;
pub mod node;
pub mod record;

pub use diagnostic::{DiagnosticEntry, SkipReason};
pub use errors::{Error, Result, ResultExt};
pub use gesture::{Gesture, GestureSet, ReferenceResolution};
pub use node::{Activity, Bounds, HierarchyDocument, UiNode, UNKNOWN_CLASS};
pub use record::{ComponentInfo, MatchRecord, Spacing};
