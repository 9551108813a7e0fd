use crate::path::Path;

/// Errors produced by tree operations and transforms.
///
/// Every variant is recoverable: a failed operation leaves the caller's
/// state untouched, and composed operations propagate child errors
/// unchanged rather than swallowing them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// A path did not resolve to a node (invalid index at some depth).
    #[error("no node at path '{path}'")]
    Addressing { path: Path },

    /// An operation required matching child kinds or a content-model match
    /// and found a mismatch.
    #[error("structural mismatch: {reason}")]
    StructuralMismatch { reason: String },

    /// A transform's entry precondition (selection shape, ancestor
    /// existence) was unmet.
    #[error("precondition failed: {reason}")]
    Precondition { reason: String },

    /// No registered definition matched an external node.
    #[error("no definition matched {what}")]
    Decode { what: String },

    /// An element name with no registered definition was encountered while
    /// encoding or validating.
    #[error("no definition registered for element '{name}'")]
    UnknownElement { name: String },
}

impl EditError {
    pub fn addressing(path: &Path) -> Self {
        EditError::Addressing { path: path.clone() }
    }

    pub fn mismatch(reason: impl Into<String>) -> Self {
        EditError::StructuralMismatch {
            reason: reason.into(),
        }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        EditError::Precondition {
            reason: reason.into(),
        }
    }
}
