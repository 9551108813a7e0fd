//! # List transforms
//!
//! Split, lift, wrap, and join logic for ordered/unordered lists and list
//! items. Every transform shares one precondition: the selection is present
//! and addresses a node inside a `list_item` subtree. A missing
//! precondition is always a named failure, never a silent no-op.
//!
//! Transforms that rebuild the tree pin the selection endpoints with the
//! reserved annotation tags, rewrite, recover the endpoints by tag search,
//! and clear every tag before returning (see `editing::selection`).

use crate::editing::selection::{
    Selection, annotate_selection, clear_selection_annotations, selection_from_annotations,
};
use crate::editing::state::EditorState;
use crate::error::EditError;
use crate::model::ops::{
    clear_annotations, find_ancestor, find_last_path, join_blocks, node_at, replace,
    replace_with_fragment, rewrite, split_at,
};
use crate::model::{Block, Children, Node};
use crate::path::Path;
use crate::schema::builtins::{LIST_ITEM, ORDERED_LIST, UNORDERED_LIST};

/// Reserved tag marking nodes whose list wrapper is being removed.
pub const LIFT_TAG: &str = "lift:pending";

fn require_selection(state: &EditorState) -> Result<Selection, EditError> {
    state
        .selection
        .clone()
        .ok_or_else(|| EditError::precondition("no selection"))
}

fn is_list(node: &Node) -> bool {
    matches!(node.element(), Some(e) if e == UNORDERED_LIST || e == ORDERED_LIST)
}

fn list_item_ancestor(root: &Block, path: &Path) -> Result<(Path, Block), EditError> {
    let (found, node) = find_ancestor(root, path, |n| n.element() == Some(LIST_ITEM))
        .ok_or_else(|| EditError::precondition("no list item ancestor"))?;
    let block = node
        .into_block()
        .ok_or_else(|| EditError::mismatch("list item is not a block"))?;
    Ok((found, block))
}

/// Wrap the block containing the selection anchor in a new list with a
/// single list item.
pub fn wrap_in_list(state: &EditorState, list_element: &str) -> Result<EditorState, EditError> {
    let sel = require_selection(state)?;
    let (block_path, _) = find_ancestor(&state.doc, &sel.anchor, |n| matches!(n, Node::Block(_)))
        .ok_or_else(|| EditError::precondition("no block at selection"))?;
    if block_path.is_root() {
        return Err(EditError::precondition("cannot wrap the document root"));
    }

    let doc = annotate_selection(&sel, &state.doc)?;
    let target = node_at(&doc, &block_path)
        .and_then(Node::into_block)
        .ok_or_else(|| EditError::addressing(&block_path))?;
    let item = Block::container(LIST_ITEM, vec![target]);
    let list = Block::container(list_element, vec![item]);
    let doc = replace(&doc, &block_path, Node::Block(list))?;

    let selection = selection_from_annotations(&doc, sel.anchor_offset, sel.focus_offset);
    let doc = clear_selection_annotations(&doc);
    Ok(EditorState { doc, selection })
}

/// Split the list item containing a collapsed selection into two sibling
/// items at the selection point.
pub fn split_list_item(state: &EditorState) -> Result<EditorState, EditError> {
    let sel = require_selection(state)?;
    if !sel.is_collapsed() {
        return Err(EditError::precondition("selection is not collapsed"));
    }
    let (item_path, _) = list_item_ancestor(&state.doc, &sel.anchor)?;

    let doc = split_at(&state.doc, &item_path, &sel.anchor, sel.anchor_offset)?;

    // Caret lands on the first leaf position of the second item: the split
    // spine becomes the leading zeros of the new path.
    let spine_depth = sel.anchor.len() - item_path.len();
    let mut caret = item_path.increment();
    for _ in 0..spine_depth {
        caret = caret.child(0);
    }
    Ok(EditorState {
        doc,
        selection: Some(Selection::collapsed(caret, 0)),
    })
}

/// Lift when the caret sits at offset 0 of a list item whose first child is
/// an empty text block; fail with the specific unmet condition otherwise.
pub fn lift_empty_list_item(state: &EditorState) -> Result<EditorState, EditError> {
    let sel = require_selection(state)?;
    if !sel.is_collapsed() || sel.anchor_offset != 0 {
        return Err(EditError::precondition("selection is not a caret at offset 0"));
    }
    let (_, item) = list_item_ancestor(&state.doc, &sel.anchor)?;
    match item.get_child(0) {
        Some(Node::Block(first)) if is_empty_text_block(&first) => lift_list_item(state),
        _ => Err(EditError::precondition(
            "list item does not start with an empty text block",
        )),
    }
}

fn is_empty_text_block(block: &Block) -> bool {
    match &block.children {
        Children::Inlines(inlines) => inlines.iter().all(|inline| match inline {
            crate::model::Inline::Text(run) => run.text.is_empty(),
            crate::model::Inline::Leaf(_) => false,
        }),
        _ => false,
    }
}

/// Remove one level of list nesting for the list item(s) spanning the
/// selection.
pub fn lift_list_item(state: &EditorState) -> Result<EditorState, EditError> {
    let sel = require_selection(state)?.normalize();
    let doc = annotate_selection(&sel, &state.doc)?;

    let (anchor_item, _) = list_item_ancestor(&doc, &sel.anchor)?;
    let (focus_item, _) = list_item_ancestor(&doc, &sel.focus)?;

    let doc = if anchor_item == focus_item {
        tag_for_lift(&doc, &anchor_item)?
    } else {
        let common = anchor_item.common_ancestor(&focus_item);
        let common_node = node_at(&doc, &common).ok_or_else(|| EditError::addressing(&common))?;
        if !is_list(&common_node) {
            return Err(EditError::precondition(
                "common ancestor of the selected list items is not a list",
            ));
        }
        let depth = common.len();
        let start = anchor_item.as_slice()[depth];
        let end = focus_item.as_slice()[depth];
        let mut tagged = doc;
        for index in start..=end {
            tagged = tag_for_lift(&tagged, &common.child(index))?;
        }
        tagged
    };

    let doc = rewrite(&lift_rewrite, doc)?;
    let doc = rewrite(&lift_rewrite, doc)?;

    let selection = selection_from_annotations(&doc, sel.anchor_offset, sel.focus_offset);
    let doc = clear_annotations(&clear_selection_annotations(&doc), LIFT_TAG);
    Ok(EditorState { doc, selection })
}

/// Tag a list item and each of its direct children for lifting.
fn tag_for_lift(root: &Block, path: &Path) -> Result<Block, EditError> {
    let node = node_at(root, path).ok_or_else(|| EditError::addressing(path))?;
    let mut item = node
        .into_block()
        .ok_or_else(|| EditError::mismatch("lift target is not a block"))?;
    if item.element != LIST_ITEM {
        return Err(EditError::precondition("lift target is not a list item"));
    }
    item.annotations.insert(LIFT_TAG.to_string());
    match &mut item.children {
        Children::Blocks(children) => {
            for child in children {
                child.annotations.insert(LIFT_TAG.to_string());
            }
        }
        Children::Inlines(inlines) => {
            for inline in inlines {
                inline.annotations_mut().insert(LIFT_TAG.to_string());
            }
        }
        Children::None => {}
    }
    replace(root, path, Node::Block(item))
}

/// The bottom-up lift pass: tagged list items are replaced by their
/// children, and lists split around tagged children that escaped an item,
/// dropping empty list shells.
fn lift_rewrite(mut block: Block) -> Vec<Block> {
    if block.element == LIST_ITEM && block.is_annotated(LIFT_TAG) {
        if matches!(block.children, Children::Blocks(_)) {
            let Children::Blocks(children) =
                std::mem::replace(&mut block.children, Children::None)
            else {
                unreachable!()
            };
            return children;
        }
        return vec![block];
    }

    if block.element == UNORDERED_LIST || block.element == ORDERED_LIST {
        let escaped = matches!(&block.children, Children::Blocks(children)
            if children.iter().any(|c| c.element != LIST_ITEM && c.is_annotated(LIFT_TAG)));
        if escaped {
            let Children::Blocks(children) =
                std::mem::replace(&mut block.children, Children::None)
            else {
                unreachable!()
            };
            let shell = block;
            let mut out = Vec::new();
            let mut run: Vec<Block> = Vec::new();
            for child in children {
                if child.element != LIST_ITEM && child.is_annotated(LIFT_TAG) {
                    if !run.is_empty() {
                        out.push(list_shell(&shell, std::mem::take(&mut run)));
                    }
                    out.push(child);
                } else {
                    run.push(child);
                }
            }
            if !run.is_empty() {
                out.push(list_shell(&shell, run));
            }
            return out;
        }
    }

    vec![block]
}

fn list_shell(template: &Block, children: Vec<Block>) -> Block {
    Block {
        element: template.element.clone(),
        attrs: template.attrs.clone(),
        annotations: template.annotations.clone(),
        children: Children::Blocks(children),
    }
}

/// Backward-delete at the very start of a list item: join with the
/// previous item, or lift when this is the list's first item.
pub fn join_list_item_backward(state: &EditorState) -> Result<EditorState, EditError> {
    let sel = require_selection(state)?;
    if !sel.is_collapsed() || sel.anchor_offset != 0 {
        return Err(EditError::precondition("selection is not a caret at offset 0"));
    }
    let (item_path, _) = list_item_ancestor(&state.doc, &sel.anchor)?;
    let suffix = sel
        .anchor
        .strip_prefix(&item_path)
        .ok_or_else(|| EditError::addressing(&sel.anchor))?;
    if suffix.iter().any(|&index| index != 0) {
        return Err(EditError::precondition(
            "caret is not at the first position of the list item",
        ));
    }

    // The first item has nothing before it to join with.
    if item_path.last() == Some(0) {
        return lift_list_item(state);
    }

    let prev_path = item_path.decrement();
    let doc = annotate_selection(&sel, &state.doc)?;
    let prev = node_at(&doc, &prev_path).ok_or_else(|| EditError::addressing(&prev_path))?;
    let prev = prev
        .into_block()
        .ok_or_else(|| EditError::mismatch("previous sibling is not a block"))?;
    let current = node_at(&doc, &item_path)
        .and_then(Node::into_block)
        .ok_or_else(|| EditError::addressing(&item_path))?;

    let joined = join_blocks(&prev, &current)?;
    let doc = replace(&doc, &prev_path, Node::Block(joined))?;
    let doc = replace_with_fragment(&doc, &item_path, vec![])?;

    let selection = selection_from_annotations(&doc, sel.anchor_offset, sel.focus_offset);
    let doc = clear_selection_annotations(&doc);
    Ok(EditorState { doc, selection })
}

/// Forward-delete at the very end of a list item: join the current item
/// with the next sibling item.
pub fn join_list_item_forward(state: &EditorState) -> Result<EditorState, EditError> {
    let sel = require_selection(state)?;
    if !sel.is_collapsed() {
        return Err(EditError::precondition("selection is not collapsed"));
    }
    let (item_path, item) = list_item_ancestor(&state.doc, &sel.anchor)?;

    let (last_rel, last_node) = find_last_path(&Node::Block(item));
    if sel.anchor != item_path.join(&last_rel) || sel.anchor_offset != last_node.end_offset() {
        return Err(EditError::precondition(
            "caret is not at the last position of the list item",
        ));
    }

    let next_path = item_path.increment();
    let doc = annotate_selection(&sel, &state.doc)?;
    let next = node_at(&doc, &next_path).ok_or_else(|| EditError::addressing(&next_path))?;
    let next = next
        .into_block()
        .ok_or_else(|| EditError::mismatch("next sibling is not a block"))?;
    let current = node_at(&doc, &item_path)
        .and_then(Node::into_block)
        .ok_or_else(|| EditError::addressing(&item_path))?;

    let joined = join_blocks(&current, &next)?;
    let doc = replace(&doc, &item_path, Node::Block(joined))?;
    let doc = replace_with_fragment(&doc, &next_path, vec![])?;

    let selection = selection_from_annotations(&doc, sel.anchor_offset, sel.focus_offset);
    let doc = clear_selection_annotations(&doc);
    Ok(EditorState { doc, selection })
}
