use serde::{Deserialize, Serialize};

use crate::editing::selection::Selection;
use crate::model::Block;

/// The complete editable state of one editor instance: the owning document
/// root and the current selection.
///
/// Transforms never mutate a state; they return a wholly new one. Document
/// and selection are always replaced together, so no partially-updated
/// state is ever observable, and a failed transform leaves the caller's
/// state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    pub doc: Block,
    pub selection: Option<Selection>,
}

impl EditorState {
    pub fn new(doc: Block) -> Self {
        EditorState {
            doc,
            selection: None,
        }
    }

    pub fn with_selection(doc: Block, selection: Selection) -> Self {
        EditorState {
            doc,
            selection: Some(selection),
        }
    }
}
