//! # Logical/rendered codecs
//!
//! Encoding walks the logical tree and asks each node's definition to wrap
//! its already-encoded children; marks wrap text runs outermost-first in
//! canonical mark order. Decoding probes definitions in registration order;
//! a rendered node no definition claims is simply skipped (rendered trees
//! legitimately contain decoration the logical model does not represent),
//! except at the document root where a failed decode is an error.

use std::collections::BTreeSet;

use prosetree_dom::RenderedNode;

use crate::error::EditError;
use crate::model::{Annotations, Block, Children, Inline, InlineLeaf, Mark, TextRun};
use crate::schema::{ContentKind, Schema};

/// Encode a logical block into its rendered form.
pub fn encode_node(schema: &Schema, block: &Block) -> Result<RenderedNode, EditError> {
    let def = schema
        .node(&block.element)
        .ok_or_else(|| EditError::UnknownElement {
            name: block.element.clone(),
        })?;
    let children = match &block.children {
        Children::Blocks(blocks) => blocks
            .iter()
            .map(|child| encode_node(schema, child))
            .collect::<Result<Vec<_>, _>>()?,
        Children::Inlines(inlines) => inlines
            .iter()
            .map(|inline| encode_inline(schema, inline))
            .collect::<Result<Vec<_>, _>>()?,
        Children::None => Vec::new(),
    };
    Ok(def.encode(&block.attrs, children))
}

fn encode_inline(schema: &Schema, inline: &Inline) -> Result<RenderedNode, EditError> {
    match inline {
        Inline::Text(run) => {
            let mut rendered = RenderedNode::text(&run.text);
            // Wrap inside-out so the first mark in canonical order ends up
            // outermost.
            for mark in run.marks.iter().rev() {
                let def = schema
                    .mark(&mark.name)
                    .ok_or_else(|| EditError::UnknownElement {
                        name: mark.name.clone(),
                    })?;
                rendered = def.encode(mark, vec![rendered]);
            }
            Ok(rendered)
        }
        Inline::Leaf(leaf) => {
            let def = schema
                .node(&leaf.element)
                .ok_or_else(|| EditError::UnknownElement {
                    name: leaf.element.clone(),
                })?;
            Ok(def.encode(&leaf.attrs, Vec::new()))
        }
    }
}

/// Decode a rendered tree whose root must match some block definition.
pub fn decode_document(schema: &Schema, rendered: &RenderedNode) -> Result<Block, EditError> {
    decode_node(schema, rendered).ok_or_else(|| EditError::Decode {
        what: rendered
            .tag()
            .map(|tag| format!("element <{tag}>"))
            .unwrap_or_else(|| "text node".to_string()),
    })
}

/// Try each block definition against a rendered node, in registration
/// order. `None` means no definition matched, never a partial node.
pub fn decode_node(schema: &Schema, rendered: &RenderedNode) -> Option<Block> {
    for def in schema.nodes() {
        if def.content == ContentKind::InlineLeaf {
            continue;
        }
        let Some(decoded) = def.decode(rendered) else {
            continue;
        };
        let children = match def.content {
            ContentKind::Blocks => Children::Blocks(
                decoded
                    .children
                    .iter()
                    .filter_map(|child| decode_node(schema, child))
                    .collect(),
            ),
            ContentKind::Inlines => Children::Inlines(decode_inline_fragment(
                schema,
                &decoded.children,
                &BTreeSet::new(),
            )),
            ContentKind::Void | ContentKind::InlineLeaf => Children::None,
        };
        return Some(Block {
            element: def.name.clone(),
            attrs: decoded.attrs,
            annotations: Annotations::new(),
            children,
        });
    }
    None
}

/// Decode a rendered fragment into inline content, accumulating marks as
/// mark elements unwrap. Undecodable elements are dropped.
pub fn decode_inline_fragment(
    schema: &Schema,
    nodes: &[RenderedNode],
    marks: &BTreeSet<Mark>,
) -> Vec<Inline> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            RenderedNode::Text(text) => {
                out.push(Inline::Text(TextRun::marked(text.clone(), marks.clone())));
            }
            element => {
                if let Some(mark) = schema.marks().find_map(|def| def.decode(element)) {
                    let mut inner = marks.clone();
                    inner.insert(mark);
                    out.extend(decode_inline_fragment(schema, element.children(), &inner));
                } else if let Some(leaf) = decode_inline_leaf(schema, element) {
                    out.push(leaf);
                }
            }
        }
    }
    out
}

fn decode_inline_leaf(schema: &Schema, rendered: &RenderedNode) -> Option<Inline> {
    schema
        .nodes()
        .filter(|def| def.content == ContentKind::InlineLeaf)
        .find_map(|def| {
            def.decode(rendered).map(|decoded| {
                Inline::Leaf(InlineLeaf {
                    element: def.name.clone(),
                    attrs: decoded.attrs,
                    annotations: Annotations::new(),
                })
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attrs;
    use crate::schema::builtins;
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        builtins::schema()
    }

    fn marked(text: &str, marks: &[Mark]) -> Inline {
        Inline::Text(TextRun::marked(text, marks.iter().cloned().collect()))
    }

    #[test]
    fn a_paragraph_document_round_trips() {
        let doc = Block::container(
            builtins::DOC,
            vec![Block::text_block(
                builtins::PARAGRAPH,
                vec![Inline::Text(TextRun::plain("hello"))],
            )],
        );
        let rendered = encode_node(&schema(), &doc).unwrap();
        assert_eq!(rendered.tag(), Some("div"));
        assert_eq!(decode_document(&schema(), &rendered), Ok(doc));
    }

    #[test]
    fn marks_nest_outermost_first_in_canonical_order() {
        let doc = Block::text_block(
            builtins::PARAGRAPH,
            vec![marked("hi", &[Mark::new(builtins::ITALIC), Mark::new(builtins::BOLD)])],
        );
        let rendered = encode_node(&schema(), &doc).unwrap();
        // Canonical order puts bold before italic, so b wraps i.
        let bold = &rendered.children()[0];
        assert_eq!(bold.tag(), Some("b"));
        let italic = &bold.children()[0];
        assert_eq!(italic.tag(), Some("i"));
        assert_eq!(italic.children()[0], RenderedNode::text("hi"));
    }

    #[test]
    fn nested_mark_elements_decode_to_one_marked_run() {
        let rendered = RenderedNode::element(
            "p",
            vec![RenderedNode::element(
                "b",
                vec![RenderedNode::element("i", vec![RenderedNode::text("hi")])],
            )],
        );
        let decoded = decode_node(&schema(), &rendered).unwrap();
        let expected = Block::text_block(
            builtins::PARAGRAPH,
            vec![marked("hi", &[Mark::new(builtins::BOLD), Mark::new(builtins::ITALIC)])],
        );
        assert_eq!(decoded, expected);
    }

    #[test]
    fn link_href_decodes_under_the_src_key() {
        let rendered = RenderedNode::element(
            "p",
            vec![RenderedNode::element_with_attrs(
                "a",
                vec![("href", "https://example.com")],
                vec![RenderedNode::text("go")],
            )],
        );
        let decoded = decode_node(&schema(), &rendered).unwrap();
        let expected = Block::text_block(
            builtins::PARAGRAPH,
            vec![marked(
                "go",
                &[Mark::with_attrs(
                    builtins::LINK,
                    Attrs::new().with("src", "https://example.com"),
                )],
            )],
        );
        assert_eq!(decoded, expected);
    }

    #[test]
    fn hard_breaks_decode_as_inline_leaves() {
        let rendered = RenderedNode::element(
            "p",
            vec![
                RenderedNode::text("a"),
                RenderedNode::element("br", vec![]),
                RenderedNode::text("b"),
            ],
        );
        let decoded = decode_node(&schema(), &rendered).unwrap();
        let expected = Block::text_block(
            builtins::PARAGRAPH,
            vec![
                Inline::Text(TextRun::plain("a")),
                Inline::Leaf(InlineLeaf::new(builtins::HARD_BREAK)),
                Inline::Text(TextRun::plain("b")),
            ],
        );
        assert_eq!(decoded, expected);
    }

    #[test]
    fn unknown_decoration_is_skipped_not_an_error() {
        let rendered = RenderedNode::element(
            "p",
            vec![
                RenderedNode::text("kept"),
                RenderedNode::element("span", vec![RenderedNode::text("ignored")]),
            ],
        );
        let decoded = decode_node(&schema(), &rendered).unwrap();
        let expected = Block::text_block(
            builtins::PARAGRAPH,
            vec![Inline::Text(TextRun::plain("kept"))],
        );
        assert_eq!(decoded, expected);
    }

    #[test]
    fn undecodable_root_is_an_error() {
        let err = decode_document(&schema(), &RenderedNode::element("marquee", vec![]));
        assert_eq!(
            err,
            Err(EditError::Decode {
                what: "element <marquee>".to_string()
            })
        );
    }

    #[test]
    fn code_block_round_trips_through_pre_code() {
        let doc = Block::text_block(
            builtins::CODE_BLOCK,
            vec![Inline::Text(TextRun::plain("let x = 1;"))],
        );
        let rendered = encode_node(&schema(), &doc).unwrap();
        assert_eq!(rendered.tag(), Some("pre"));
        assert_eq!(decode_node(&schema(), &rendered), Some(doc));
    }

    #[test]
    fn a_list_document_round_trips() {
        let doc = Block::container(
            builtins::DOC,
            vec![Block::container(
                builtins::ORDERED_LIST,
                vec![
                    Block::container(
                        builtins::LIST_ITEM,
                        vec![Block::text_block(
                            builtins::PARAGRAPH,
                            vec![Inline::Text(TextRun::plain("first"))],
                        )],
                    ),
                    Block::container(
                        builtins::LIST_ITEM,
                        vec![Block::text_block(
                            builtins::PARAGRAPH,
                            vec![Inline::Text(TextRun::plain("second"))],
                        )],
                    ),
                ],
            )],
        );
        let rendered = encode_node(&schema(), &doc).unwrap();
        assert_eq!(decode_document(&schema(), &rendered), Ok(doc));
    }
}
