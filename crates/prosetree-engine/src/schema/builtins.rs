//! # Builtin node and mark definitions
//!
//! The default element/mark vocabulary and its rendered-tree codecs. The
//! rendered shapes match the production serializer byte for byte, so trees
//! decoded from an existing rendered view round-trip unchanged:
//!
//! | element          | rendered                  |
//! |------------------|---------------------------|
//! | `doc`            | `div[data-rte-doc=true]`  |
//! | `paragraph`      | `p`                       |
//! | `blockquote`     | `blockquote`              |
//! | `horizontal_rule`| `hr` (selectable)         |
//! | `heading`        | `h1`..`h6` via `level`    |
//! | `code_block`     | `pre > code`              |
//! | `image`          | `img` (selectable)        |
//! | `hard_break`     | `br`                      |
//! | `unordered_list` | `ul`                      |
//! | `ordered_list`   | `ol`                      |
//! | `list_item`      | `li`                      |
//!
//! `underline` and `strikethrough` are deliberately not in [`schema`]: they
//! show how external code extends the mark set (see `extended_marks`).

use prosetree_dom::RenderedNode;

use crate::model::{Attrs, Block, Mark};
use crate::schema::{
    ContentKind, DecodedNode, MarkDefinition, NodeDefinition, Schema,
};

pub const DOC: &str = "doc";
pub const PARAGRAPH: &str = "paragraph";
pub const BLOCKQUOTE: &str = "blockquote";
pub const HORIZONTAL_RULE: &str = "horizontal_rule";
pub const HEADING: &str = "heading";
pub const CODE_BLOCK: &str = "code_block";
pub const IMAGE: &str = "image";
pub const HARD_BREAK: &str = "hard_break";
pub const UNORDERED_LIST: &str = "unordered_list";
pub const ORDERED_LIST: &str = "ordered_list";
pub const LIST_ITEM: &str = "list_item";

pub const LINK: &str = "link";
pub const BOLD: &str = "bold";
pub const ITALIC: &str = "italic";
pub const CODE: &str = "code";
pub const UNDERLINE: &str = "underline";
pub const STRIKETHROUGH: &str = "strikethrough";

const GROUP_DOCUMENT: &str = "document";
const GROUP_BLOCK: &str = "block";
const GROUP_LIST_ITEM: &str = "list_item";
const GROUP_INLINE: &str = "inline";

/// A schema containing every builtin node and mark definition.
pub fn schema() -> Schema {
    Schema::new(node_definitions(), mark_definitions())
}

/// The builtin node definitions, in registration order.
pub fn node_definitions() -> Vec<NodeDefinition> {
    vec![
        doc(),
        paragraph(),
        blockquote(),
        horizontal_rule(),
        heading(),
        code_block(),
        image(),
        hard_break(),
        unordered_list(),
        ordered_list(),
        list_item(),
    ]
}

/// The builtin mark definitions, in registration order.
pub fn mark_definitions() -> Vec<MarkDefinition> {
    vec![link(), bold(), italic(), code()]
}

/// Marks shipped outside the default set, registered by callers that want
/// them: `Schema::new(node_definitions(), [mark_definitions(),
/// extended_marks()].concat())`.
pub fn extended_marks() -> Vec<MarkDefinition> {
    vec![underline(), strikethrough()]
}

pub fn doc() -> NodeDefinition {
    NodeDefinition::new(DOC, GROUP_DOCUMENT, ContentKind::Blocks, encode_doc, decode_doc)
        .with_allowed_groups(&[GROUP_BLOCK])
}

fn encode_doc(_: &Attrs, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element_with_attrs("div", vec![("data-rte-doc", "true")], children)
}

fn decode_doc(rendered: &RenderedNode) -> Option<DecodedNode> {
    if rendered.tag() == Some("div") && rendered.attr("data-rte-doc") == Some("true") {
        Some(DecodedNode {
            attrs: Attrs::new(),
            children: rendered.children().to_vec(),
        })
    } else {
        None
    }
}

pub fn paragraph() -> NodeDefinition {
    NodeDefinition::new(
        PARAGRAPH,
        GROUP_BLOCK,
        ContentKind::Inlines,
        encode_paragraph,
        decode_paragraph,
    )
}

fn encode_paragraph(_: &Attrs, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("p", children)
}

fn decode_paragraph(rendered: &RenderedNode) -> Option<DecodedNode> {
    attrless_match(rendered, "p")
}

pub fn blockquote() -> NodeDefinition {
    NodeDefinition::new(
        BLOCKQUOTE,
        GROUP_BLOCK,
        ContentKind::Blocks,
        encode_blockquote,
        decode_blockquote,
    )
    .with_allowed_groups(&[GROUP_BLOCK])
}

fn encode_blockquote(_: &Attrs, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("blockquote", children)
}

fn decode_blockquote(rendered: &RenderedNode) -> Option<DecodedNode> {
    attrless_match(rendered, "blockquote")
}

pub fn horizontal_rule() -> NodeDefinition {
    NodeDefinition::new(
        HORIZONTAL_RULE,
        GROUP_BLOCK,
        ContentKind::Void,
        encode_horizontal_rule,
        decode_horizontal_rule,
    )
    .selectable()
}

fn encode_horizontal_rule(_: &Attrs, _: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("hr", vec![])
}

fn decode_horizontal_rule(rendered: &RenderedNode) -> Option<DecodedNode> {
    attrless_match(rendered, "hr")
}

pub fn heading() -> NodeDefinition {
    NodeDefinition::new(
        HEADING,
        GROUP_BLOCK,
        ContentKind::Inlines,
        encode_heading,
        decode_heading,
    )
}

fn encode_heading(attrs: &Attrs, children: Vec<RenderedNode>) -> RenderedNode {
    let level = attrs.get_int_or("level", 1).clamp(1, 6);
    RenderedNode::element(format!("h{level}"), children)
}

fn decode_heading(rendered: &RenderedNode) -> Option<DecodedNode> {
    let tag = rendered.tag()?;
    let level = match tag {
        "h1" => 1,
        "h2" => 2,
        "h3" => 3,
        "h4" => 4,
        "h5" => 5,
        "h6" => 6,
        _ => return None,
    };
    Some(DecodedNode {
        attrs: Attrs::new().with("level", level as i64),
        children: rendered.children().to_vec(),
    })
}

pub fn code_block() -> NodeDefinition {
    NodeDefinition::new(
        CODE_BLOCK,
        GROUP_BLOCK,
        ContentKind::Inlines,
        encode_code_block,
        decode_code_block,
    )
    .with_path_mapping(code_block_to_rendered, code_block_to_logical)
}

fn encode_code_block(_: &Attrs, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("pre", vec![RenderedNode::element("code", children)])
}

fn decode_code_block(rendered: &RenderedNode) -> Option<DecodedNode> {
    if rendered.tag() != Some("pre") {
        return None;
    }
    match rendered.children() {
        [inner] if inner.tag() == Some("code") => Some(DecodedNode {
            attrs: Attrs::new(),
            children: inner.children().to_vec(),
        }),
        _ => None,
    }
}

// Rendered children sit one level down, inside the `code` wrapper.
fn code_block_to_rendered(_: &Block, index: usize) -> Vec<i32> {
    vec![0, index as i32]
}

fn code_block_to_logical(_: &Block, suffix: &[i32]) -> Option<(i32, usize)> {
    match suffix {
        [0, index, ..] => Some((*index, 2)),
        _ => None,
    }
}

pub fn image() -> NodeDefinition {
    NodeDefinition::new(IMAGE, GROUP_BLOCK, ContentKind::Void, encode_image, decode_image)
        .selectable()
}

fn encode_image(attrs: &Attrs, _: Vec<RenderedNode>) -> RenderedNode {
    let mut rendered_attrs = Vec::new();
    for key in ["src", "alt", "title"] {
        if let Some(value) = attrs.get_str(key) {
            rendered_attrs.push((key, value));
        }
    }
    RenderedNode::element_with_attrs("img", rendered_attrs, vec![])
}

fn decode_image(rendered: &RenderedNode) -> Option<DecodedNode> {
    if rendered.tag() != Some("img") {
        return None;
    }
    let src = rendered.attr("src").filter(|s| !s.is_empty())?;
    let mut attrs = Attrs::new().with("src", src);
    for key in ["alt", "title"] {
        if let Some(value) = rendered.attr(key) {
            attrs.insert(key, value);
        }
    }
    Some(DecodedNode {
        attrs,
        children: vec![],
    })
}

pub fn hard_break() -> NodeDefinition {
    NodeDefinition::new(
        HARD_BREAK,
        GROUP_INLINE,
        ContentKind::InlineLeaf,
        encode_hard_break,
        decode_hard_break,
    )
}

fn encode_hard_break(_: &Attrs, _: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("br", vec![])
}

fn decode_hard_break(rendered: &RenderedNode) -> Option<DecodedNode> {
    attrless_match(rendered, "br")
}

pub fn unordered_list() -> NodeDefinition {
    NodeDefinition::new(
        UNORDERED_LIST,
        GROUP_BLOCK,
        ContentKind::Blocks,
        encode_unordered_list,
        decode_unordered_list,
    )
    .with_allowed_groups(&[GROUP_LIST_ITEM])
}

fn encode_unordered_list(_: &Attrs, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("ul", children)
}

fn decode_unordered_list(rendered: &RenderedNode) -> Option<DecodedNode> {
    attrless_match(rendered, "ul")
}

pub fn ordered_list() -> NodeDefinition {
    NodeDefinition::new(
        ORDERED_LIST,
        GROUP_BLOCK,
        ContentKind::Blocks,
        encode_ordered_list,
        decode_ordered_list,
    )
    .with_allowed_groups(&[GROUP_LIST_ITEM])
}

fn encode_ordered_list(_: &Attrs, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("ol", children)
}

fn decode_ordered_list(rendered: &RenderedNode) -> Option<DecodedNode> {
    attrless_match(rendered, "ol")
}

pub fn list_item() -> NodeDefinition {
    NodeDefinition::new(
        LIST_ITEM,
        GROUP_LIST_ITEM,
        ContentKind::Blocks,
        encode_list_item,
        decode_list_item,
    )
    .with_allowed_groups(&[GROUP_BLOCK])
}

fn encode_list_item(_: &Attrs, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("li", children)
}

fn decode_list_item(rendered: &RenderedNode) -> Option<DecodedNode> {
    attrless_match(rendered, "li")
}

pub fn link() -> MarkDefinition {
    MarkDefinition::new(LINK, encode_link, decode_link)
}

fn encode_link(mark: &Mark, children: Vec<RenderedNode>) -> RenderedNode {
    let mut rendered_attrs = Vec::new();
    // The decoded key is "src", not "href"; see decode_link.
    if let Some(href) = mark.attrs.get_str("src") {
        rendered_attrs.push(("href", href));
    }
    if let Some(title) = mark.attrs.get_str("title") {
        rendered_attrs.push(("title", title));
    }
    RenderedNode::element_with_attrs("a", rendered_attrs, children)
}

fn decode_link(rendered: &RenderedNode) -> Option<Mark> {
    if rendered.tag() != Some("a") {
        return None;
    }
    let href = rendered.attr("href").filter(|h| !h.is_empty())?;
    // Long-standing wart kept for compatibility with documents in the
    // wild: the href lands under the attribute key "src", the same key
    // images use.
    let mut attrs = Attrs::new().with("src", href);
    if let Some(title) = rendered.attr("title") {
        attrs.insert("title", title);
    }
    Some(Mark::with_attrs(LINK, attrs))
}

pub fn bold() -> MarkDefinition {
    MarkDefinition::new(BOLD, encode_bold, decode_bold)
}

fn encode_bold(_: &Mark, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("b", children)
}

fn decode_bold(rendered: &RenderedNode) -> Option<Mark> {
    mark_tag_match(rendered, "b", BOLD)
}

pub fn italic() -> MarkDefinition {
    MarkDefinition::new(ITALIC, encode_italic, decode_italic)
}

fn encode_italic(_: &Mark, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("i", children)
}

fn decode_italic(rendered: &RenderedNode) -> Option<Mark> {
    mark_tag_match(rendered, "i", ITALIC)
}

pub fn code() -> MarkDefinition {
    MarkDefinition::new(CODE, encode_code, decode_code)
}

fn encode_code(_: &Mark, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("code", children)
}

fn decode_code(rendered: &RenderedNode) -> Option<Mark> {
    mark_tag_match(rendered, "code", CODE)
}

pub fn underline() -> MarkDefinition {
    MarkDefinition::new(UNDERLINE, encode_underline, decode_underline)
}

fn encode_underline(_: &Mark, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("u", children)
}

fn decode_underline(rendered: &RenderedNode) -> Option<Mark> {
    mark_tag_match(rendered, "u", UNDERLINE)
}

pub fn strikethrough() -> MarkDefinition {
    MarkDefinition::new(STRIKETHROUGH, encode_strikethrough, decode_strikethrough)
}

fn encode_strikethrough(_: &Mark, children: Vec<RenderedNode>) -> RenderedNode {
    RenderedNode::element("s", children)
}

fn decode_strikethrough(rendered: &RenderedNode) -> Option<Mark> {
    mark_tag_match(rendered, "s", STRIKETHROUGH)
}

fn attrless_match(rendered: &RenderedNode, tag: &str) -> Option<DecodedNode> {
    if rendered.tag() == Some(tag) {
        Some(DecodedNode {
            attrs: Attrs::new(),
            children: rendered.children().to_vec(),
        })
    } else {
        None
    }
}

fn mark_tag_match(rendered: &RenderedNode, tag: &str, name: &str) -> Option<Mark> {
    if rendered.tag() == Some(tag) {
        Some(Mark::new(name))
    } else {
        None
    }
}
