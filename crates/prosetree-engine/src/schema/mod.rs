//! # Schema: node and mark definitions
//!
//! A [`Schema`] is the immutable registry mapping element and mark names to
//! their structural constraints and their codecs to/from the rendered-tree
//! representation. It is built once per editor instance and passed
//! explicitly to every operation that needs it, never held as a
//! process-wide singleton, so independent editors with different schemas
//! can coexist in one process.
//!
//! Definitions carry plain function pointers for their codecs. Besides the
//! node/rendered translation pair, each node definition carries a path
//! mapping describing how one logical child corresponds to rendered
//! children (default 1:1; a definition may wrap its children in extra
//! rendered levels, see `builtins::code_block`).

pub mod builtins;
pub mod codec;
pub mod translate;

use prosetree_dom::RenderedNode;

use crate::error::EditError;
use crate::model::{Attrs, Block, Children, Inline, Mark};

/// How a block element holds content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A block container: children are further blocks.
    Blocks,
    /// A text-bearing leaf block: children are inline content.
    Inlines,
    /// No children at all (horizontal rule, image).
    Void,
    /// An inline element with no content (hard break).
    InlineLeaf,
}

/// Encode a node's attributes and already-encoded children.
pub type EncodeNodeFn = fn(&Attrs, Vec<RenderedNode>) -> RenderedNode;
/// Try to decode a rendered node into attributes plus the rendered
/// children to recurse into; `None` means "no match", never a partial node.
pub type DecodeNodeFn = fn(&RenderedNode) -> Option<DecodedNode>;
/// Rendered sub-path segment addressing one logical child.
pub type ToRenderedFn = fn(&Block, usize) -> Vec<i32>;
/// Resolve a rendered path suffix to `(logical child index, rendered
/// indices consumed)`; `None` means the rendered path has no logical
/// correspondence at this node.
pub type ToLogicalFn = fn(&Block, &[i32]) -> Option<(i32, usize)>;
/// Encode a mark around its already-encoded content.
pub type EncodeMarkFn = fn(&Mark, Vec<RenderedNode>) -> RenderedNode;
/// Try to decode a rendered element as a mark.
pub type DecodeMarkFn = fn(&RenderedNode) -> Option<Mark>;

/// The result of a successful node decode: the node's own attributes and
/// the rendered children to decode next (already unwrapped past any extra
/// rendered levels the definition emits).
#[derive(Debug, Clone)]
pub struct DecodedNode {
    pub attrs: Attrs,
    pub children: Vec<RenderedNode>,
}

fn identity_to_rendered(_: &Block, index: usize) -> Vec<i32> {
    vec![index as i32]
}

fn identity_to_logical(_: &Block, suffix: &[i32]) -> Option<(i32, usize)> {
    suffix.first().map(|&index| (index, 1))
}

/// A registry entry for one block or inline-leaf element.
#[derive(Debug, Clone)]
pub struct NodeDefinition {
    pub name: String,
    pub group: String,
    pub content: ContentKind,
    /// Groups the children may belong to; empty means unconstrained.
    pub allowed_groups: Vec<String>,
    /// Whether the rendered node should be selected as a whole on click.
    pub selectable: bool,
    encode: EncodeNodeFn,
    decode: DecodeNodeFn,
    to_rendered: ToRenderedFn,
    to_logical: ToLogicalFn,
}

impl NodeDefinition {
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        content: ContentKind,
        encode: EncodeNodeFn,
        decode: DecodeNodeFn,
    ) -> Self {
        NodeDefinition {
            name: name.into(),
            group: group.into(),
            content,
            allowed_groups: Vec::new(),
            selectable: false,
            encode,
            decode,
            to_rendered: identity_to_rendered,
            to_logical: identity_to_logical,
        }
    }

    pub fn with_allowed_groups(mut self, groups: &[&str]) -> Self {
        self.allowed_groups = groups.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }

    /// Override the default 1:1 logical/rendered path mapping.
    pub fn with_path_mapping(mut self, to_rendered: ToRenderedFn, to_logical: ToLogicalFn) -> Self {
        self.to_rendered = to_rendered;
        self.to_logical = to_logical;
        self
    }

    pub fn encode(&self, attrs: &Attrs, children: Vec<RenderedNode>) -> RenderedNode {
        (self.encode)(attrs, children)
    }

    pub fn decode(&self, rendered: &RenderedNode) -> Option<DecodedNode> {
        (self.decode)(rendered)
    }

    pub fn rendered_step(&self, block: &Block, index: usize) -> Vec<i32> {
        (self.to_rendered)(block, index)
    }

    pub fn logical_step(&self, block: &Block, suffix: &[i32]) -> Option<(i32, usize)> {
        (self.to_logical)(block, suffix)
    }
}

/// A registry entry for one mark.
#[derive(Debug, Clone)]
pub struct MarkDefinition {
    pub name: String,
    encode: EncodeMarkFn,
    decode: DecodeMarkFn,
}

impl MarkDefinition {
    pub fn new(name: impl Into<String>, encode: EncodeMarkFn, decode: DecodeMarkFn) -> Self {
        MarkDefinition {
            name: name.into(),
            encode,
            decode,
        }
    }

    pub fn encode(&self, mark: &Mark, children: Vec<RenderedNode>) -> RenderedNode {
        (self.encode)(mark, children)
    }

    pub fn decode(&self, rendered: &RenderedNode) -> Option<Mark> {
        (self.decode)(rendered)
    }
}

/// The immutable aggregate of all registered definitions. Decode probing
/// respects registration order.
#[derive(Debug, Clone)]
pub struct Schema {
    nodes: Vec<NodeDefinition>,
    marks: Vec<MarkDefinition>,
}

impl Schema {
    pub fn new(nodes: Vec<NodeDefinition>, marks: Vec<MarkDefinition>) -> Self {
        Schema { nodes, marks }
    }

    pub fn node(&self, name: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|def| def.name == name)
    }

    pub fn mark(&self, name: &str) -> Option<&MarkDefinition> {
        self.marks.iter().find(|def| def.name == name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeDefinition> {
        self.nodes.iter()
    }

    pub fn marks(&self) -> impl Iterator<Item = &MarkDefinition> {
        self.marks.iter()
    }

    /// Check the whole tree against the content models: every block's
    /// child kind must match what its definition declares, and children
    /// must belong to the allowed groups.
    pub fn validate(&self, root: &Block) -> Result<(), EditError> {
        let def = self
            .node(&root.element)
            .ok_or_else(|| EditError::UnknownElement {
                name: root.element.clone(),
            })?;
        match (def.content, &root.children) {
            (ContentKind::Blocks, Children::Blocks(children)) => {
                for child in children {
                    let child_def =
                        self.node(&child.element)
                            .ok_or_else(|| EditError::UnknownElement {
                                name: child.element.clone(),
                            })?;
                    if !def.allowed_groups.is_empty()
                        && !def.allowed_groups.contains(&child_def.group)
                    {
                        return Err(EditError::mismatch(format!(
                            "element '{}' does not allow children from group '{}'",
                            def.name, child_def.group
                        )));
                    }
                    self.validate(child)?;
                }
                Ok(())
            }
            (ContentKind::Inlines, Children::Inlines(inlines)) => {
                for inline in inlines {
                    if let Inline::Leaf(leaf) = inline {
                        let leaf_def =
                            self.node(&leaf.element)
                                .ok_or_else(|| EditError::UnknownElement {
                                    name: leaf.element.clone(),
                                })?;
                        if leaf_def.content != ContentKind::InlineLeaf {
                            return Err(EditError::mismatch(format!(
                                "element '{}' is not an inline leaf",
                                leaf.element
                            )));
                        }
                    }
                }
                Ok(())
            }
            (ContentKind::Void, Children::None) => Ok(()),
            (kind, children) => Err(EditError::mismatch(format!(
                "element '{}' declares {kind:?} content but carries {} children",
                def.name,
                children.kind_name()
            ))),
        }
    }
}
