//! # Path translation between the logical and rendered trees
//!
//! The logical tree and the rendered tree can diverge in shape: a
//! definition may wrap its children one or more rendered levels deeper
//! (`code_block` renders as `pre > code`), and a rendered tree may carry
//! decoration the logical model does not represent. Translation walks the
//! logical tree step by step, consulting each node definition's path
//! mapping.
//!
//! The two directions fail differently on purpose. `editor_to_dom` returns
//! `None` for any out-of-range step: a logical path that does not resolve
//! has no rendered counterpart at all. `dom_to_editor` returns `None` only
//! when a *resolved* logical index is out of range; a rendered step with no
//! logical correspondence ends the walk and yields the nearest logical
//! ancestor, since clicking on decoration should still land somewhere.

use crate::model::{Block, Children};
use crate::path::Path;
use crate::schema::Schema;

/// Translate a logical path into the rendered tree.
///
/// Returns `None` if any step is out of range for the node it addresses,
/// or an element along the way has no registered definition.
pub fn editor_to_dom(schema: &Schema, root: &Block, path: &Path) -> Option<Path> {
    let mut rendered: Vec<i32> = Vec::new();
    let mut block = root;
    let mut remaining = path.as_slice();
    while let Some((&raw, rest)) = remaining.split_first() {
        let index = usize::try_from(raw).ok()?;
        if index >= block.child_count() {
            return None;
        }
        let def = schema.node(&block.element)?;
        rendered.extend(def.rendered_step(block, index));
        match &block.children {
            Children::Blocks(blocks) => block = &blocks[index],
            Children::Inlines(_) => {
                // An inline is as deep as logical paths go.
                if !rest.is_empty() {
                    return None;
                }
            }
            Children::None => return None,
        }
        remaining = rest;
    }
    Some(Path::new(rendered))
}

/// Translate a rendered path into the logical tree.
///
/// A rendered step with no logical correspondence (decoration) resolves to
/// the nearest logical ancestor reached so far; a step that resolves to an
/// out-of-range logical index returns `None`.
pub fn dom_to_editor(schema: &Schema, root: &Block, rendered: &Path) -> Option<Path> {
    let mut logical: Vec<i32> = Vec::new();
    let mut block = root;
    let mut remaining = rendered.as_slice();
    while !remaining.is_empty() {
        let def = schema.node(&block.element)?;
        let Some((raw, consumed)) = def.logical_step(block, remaining) else {
            break;
        };
        let index = usize::try_from(raw).ok()?;
        if index >= block.child_count() {
            return None;
        }
        logical.push(raw);
        remaining = &remaining[consumed..];
        match &block.children {
            Children::Blocks(blocks) => block = &blocks[index],
            // Deeper rendered structure (mark nesting, text) resolves to
            // the inline itself.
            Children::Inlines(_) | Children::None => break,
        }
    }
    Some(Path::new(logical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Inline, TextRun};
    use crate::schema::builtins;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn para(text: &str) -> Block {
        Block::text_block(builtins::PARAGRAPH, vec![Inline::Text(TextRun::plain(text))])
    }

    fn doc() -> Block {
        Block::container(
            builtins::DOC,
            vec![
                para("first"),
                Block::container(
                    builtins::UNORDERED_LIST,
                    vec![
                        Block::container(builtins::LIST_ITEM, vec![para("one")]),
                        Block::container(builtins::LIST_ITEM, vec![para("two")]),
                    ],
                ),
            ],
        )
    }

    #[rstest]
    #[case(&[])]
    #[case(&[0])]
    #[case(&[0, 0])]
    #[case(&[1, 1])]
    #[case(&[1, 1, 0, 0])]
    fn default_codecs_round_trip_in_range_paths(#[case] indices: &[i32]) {
        let schema = builtins::schema();
        let doc = doc();
        let path = Path::new(indices.to_vec());
        assert_eq!(editor_to_dom(&schema, &doc, &path), Some(path.clone()));
        assert_eq!(dom_to_editor(&schema, &doc, &path), Some(path));
    }

    #[rstest]
    #[case(&[5])]
    #[case(&[-1])]
    #[case(&[0, 9])]
    fn out_of_range_steps_translate_to_nothing(#[case] indices: &[i32]) {
        let schema = builtins::schema();
        let doc = doc();
        let path = Path::new(indices.to_vec());
        assert_eq!(editor_to_dom(&schema, &doc, &path), None);
        assert_eq!(dom_to_editor(&schema, &doc, &path), None);
    }

    #[test]
    fn code_block_children_sit_one_rendered_level_deeper() {
        let schema = builtins::schema();
        let code = Block::text_block(
            builtins::CODE_BLOCK,
            vec![Inline::Text(TextRun::plain("let x = 1;"))],
        );
        assert_eq!(
            editor_to_dom(&schema, &code, &Path::new(vec![0])),
            Some(Path::new(vec![0, 0]))
        );
        assert_eq!(
            dom_to_editor(&schema, &code, &Path::new(vec![0, 0])),
            Some(Path::new(vec![0]))
        );
    }

    #[test]
    fn rendered_decoration_resolves_to_the_nearest_logical_ancestor() {
        let schema = builtins::schema();
        let code = Block::text_block(
            builtins::CODE_BLOCK,
            vec![Inline::Text(TextRun::plain("let x = 1;"))],
        );
        // [1, 0] points beside the code wrapper; no logical node lives
        // there, so the walk stops at the root.
        assert_eq!(
            dom_to_editor(&schema, &code, &Path::new(vec![1, 0])),
            Some(Path::root())
        );
    }

    #[test]
    fn deep_rendered_paths_resolve_to_the_inline() {
        let schema = builtins::schema();
        let doc = doc();
        // Rendered structure below a text run (mark nesting) maps to the
        // run itself.
        assert_eq!(
            dom_to_editor(&schema, &doc, &Path::new(vec![0, 0, 0])),
            Some(Path::new(vec![0, 0]))
        );
    }

    #[test]
    fn logical_paths_never_descend_below_inlines() {
        let schema = builtins::schema();
        let doc = doc();
        assert_eq!(editor_to_dom(&schema, &doc, &Path::new(vec![0, 0, 0])), None);
    }

    #[test]
    fn unknown_elements_cannot_be_translated() {
        let schema = builtins::schema();
        let doc = Block::container(builtins::DOC, vec![Block::void("widget")]);
        assert_eq!(editor_to_dom(&schema, &doc, &Path::new(vec![0, 0])), None);
    }
}
