//! # Selection and annotation-based position tracking
//!
//! A [`Selection`] is an anchor/focus pair of paths and offsets. Offsets
//! count characters when the path addresses a text run and child indices
//! when it addresses a block.
//!
//! Paths do not survive structural rewrites, so transforms that rebuild the
//! tree pin the selection with reserved annotation tags first, run the
//! rewrite, then recover the (possibly moved) endpoints by searching for
//! the tags. The tags are always cleared before a transform's result is
//! returned; annotations never leak into steady-state document state. If a
//! tagged node was deleted by the rewrite, the selection is lost (`None`),
//! never a crash.

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::model::Block;
use crate::model::ops::{add_annotation, clear_annotations, find_annotated};
use crate::path::Path;

/// Reserved tag pinning the selection anchor through a rewrite.
pub const SELECTION_ANCHOR: &str = "selection:anchor";
/// Reserved tag pinning the selection focus through a rewrite.
pub const SELECTION_FOCUS: &str = "selection:focus";

/// An anchor/focus pair of paths and offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Path,
    pub anchor_offset: usize,
    pub focus: Path,
    pub focus_offset: usize,
}

impl Selection {
    pub fn new(anchor: Path, anchor_offset: usize, focus: Path, focus_offset: usize) -> Self {
        Selection {
            anchor,
            anchor_offset,
            focus,
            focus_offset,
        }
    }

    /// A collapsed selection (caret) at one position.
    pub fn collapsed(path: Path, offset: usize) -> Self {
        Selection {
            anchor: path.clone(),
            anchor_offset: offset,
            focus: path,
            focus_offset: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus && self.anchor_offset == self.focus_offset
    }

    /// Anchor and focus in document order. Operations that need a
    /// directionless range normalize first.
    pub fn normalize(&self) -> Selection {
        let anchor_key = (&self.anchor, self.anchor_offset);
        let focus_key = (&self.focus, self.focus_offset);
        if anchor_key <= focus_key {
            self.clone()
        } else {
            Selection {
                anchor: self.focus.clone(),
                anchor_offset: self.focus_offset,
                focus: self.anchor.clone(),
                focus_offset: self.anchor_offset,
            }
        }
    }
}

/// Pin both selection endpoints with the reserved tags (a shared node when
/// collapsed).
pub fn annotate_selection(selection: &Selection, root: &Block) -> Result<Block, EditError> {
    let tagged = add_annotation(root, &selection.anchor, SELECTION_ANCHOR)?;
    add_annotation(&tagged, &selection.focus, SELECTION_FOCUS)
}

/// Recover a selection from the reserved tags after a rewrite, reusing the
/// supplied offsets (structural moves change paths, not offsets). `None`
/// when either tag is gone; the caller must treat this as "selection
/// lost", not a crash.
pub fn selection_from_annotations(
    root: &Block,
    anchor_offset: usize,
    focus_offset: usize,
) -> Option<Selection> {
    let anchor = find_annotated(root, SELECTION_ANCHOR)?;
    let focus = find_annotated(root, SELECTION_FOCUS)?;
    Some(Selection::new(anchor, anchor_offset, focus, focus_offset))
}

/// Strip both reserved selection tags from every node.
pub fn clear_selection_annotations(root: &Block) -> Block {
    let cleared = clear_annotations(root, SELECTION_ANCHOR);
    clear_annotations(&cleared, SELECTION_FOCUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ops::replace_with_fragment;
    use crate::model::{Inline, Node, TextRun};
    use pretty_assertions::assert_eq;

    fn para(s: &str) -> Block {
        Block::text_block("paragraph", vec![Inline::Text(TextRun::plain(s))])
    }

    fn doc(children: Vec<Block>) -> Block {
        Block::container("doc", children)
    }

    fn p(indices: &[i32]) -> Path {
        Path::from(indices)
    }

    #[test]
    fn collapsed_means_same_path_and_offset() {
        assert!(Selection::collapsed(p(&[0, 0]), 3).is_collapsed());
        assert!(!Selection::new(p(&[0, 0]), 0, p(&[0, 0]), 1).is_collapsed());
        assert!(!Selection::new(p(&[0, 0]), 0, p(&[1, 0]), 0).is_collapsed());
    }

    #[test]
    fn normalize_orders_anchor_before_focus() {
        let backward = Selection::new(p(&[1, 0]), 2, p(&[0, 0]), 5);
        let normalized = backward.normalize();
        assert_eq!(normalized, Selection::new(p(&[0, 0]), 5, p(&[1, 0]), 2));
        // already ordered selections come back unchanged
        assert_eq!(normalized.normalize(), normalized);
    }

    #[test]
    fn normalize_orders_by_offset_within_one_node() {
        let backward = Selection::new(p(&[0, 0]), 4, p(&[0, 0]), 1);
        assert_eq!(
            backward.normalize(),
            Selection::new(p(&[0, 0]), 1, p(&[0, 0]), 4)
        );
    }

    #[test]
    fn selection_survives_a_structural_rewrite() {
        let root = doc(vec![para("one"), para("two")]);
        let selection = Selection::collapsed(p(&[1, 0]), 2);
        let tagged = annotate_selection(&selection, &root).unwrap();

        // Delete the first paragraph; every path shifts.
        let rewritten = replace_with_fragment(&tagged, &p(&[0]), vec![]).unwrap();

        let recovered = selection_from_annotations(&rewritten, 2, 2).unwrap();
        assert_eq!(recovered, Selection::collapsed(p(&[0, 0]), 2));

        let cleared = clear_selection_annotations(&rewritten);
        assert_eq!(cleared, doc(vec![para("two")]));
    }

    #[test]
    fn deleting_the_pinned_node_loses_the_selection() {
        let root = doc(vec![para("one"), para("two")]);
        let selection = Selection::collapsed(p(&[1, 0]), 0);
        let tagged = annotate_selection(&selection, &root).unwrap();

        let rewritten = replace_with_fragment(&tagged, &p(&[1]), vec![]).unwrap();
        assert_eq!(selection_from_annotations(&rewritten, 0, 0), None);
    }

    #[test]
    fn range_selection_pins_both_endpoints() {
        let root = doc(vec![para("one"), para("two")]);
        let selection = Selection::new(p(&[0, 0]), 1, p(&[1, 0]), 2);
        let tagged = annotate_selection(&selection, &root).unwrap();
        let recovered = selection_from_annotations(&tagged, 1, 2).unwrap();
        assert_eq!(recovered, selection);
    }

    #[test]
    fn annotating_an_invalid_path_is_an_addressing_error() {
        let root = doc(vec![para("one")]);
        let selection = Selection::collapsed(p(&[4, 0]), 0);
        let err = annotate_selection(&selection, &root).unwrap_err();
        assert_eq!(err, EditError::addressing(&p(&[4, 0])));
    }

    #[test]
    fn clearing_removes_tags_from_every_node() {
        let root = doc(vec![para("one"), para("two")]);
        let selection = Selection::new(p(&[0]), 0, p(&[1, 0]), 1);
        let tagged = annotate_selection(&selection, &root).unwrap();
        assert_eq!(clear_selection_annotations(&tagged), root);
    }

    #[test]
    fn node_order_in_normalize_uses_document_order() {
        // Parent-before-child: [0] precedes [0, 1].
        let sel = Selection::new(p(&[0, 1]), 0, p(&[0]), 0);
        let normalized = sel.normalize();
        assert_eq!(normalized.anchor, p(&[0]));
        assert_eq!(normalized.focus, p(&[0, 1]));
    }
}
