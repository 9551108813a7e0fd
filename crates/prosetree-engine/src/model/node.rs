//! # The document node model
//!
//! A document is a tree of [`Block`] nodes whose leaves carry [`Inline`]
//! content. Every block and inline node names an element type from the
//! schema, carries a typed attribute map, and carries a (normally empty)
//! set of transient annotation tags.
//!
//! The *kind* of a block's children (further blocks, inline content, or
//! nothing at all) is part of the node's identity: a list is a block
//! container, a paragraph is a text-bearing leaf, a horizontal rule is
//! void. `Schema::validate` enforces that the kind matches what the
//! element's definition declares.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// String form used when encoding to rendered attributes.
    pub fn render(&self) -> String {
        match self {
            AttrValue::Str(s) => s.clone(),
            AttrValue::Int(i) => i.to_string(),
            AttrValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

/// An ordered attribute map (key order is deterministic).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Attrs(BTreeMap<String, AttrValue>);

impl Attrs {
    pub fn new() -> Self {
        Attrs::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_str)
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(AttrValue::as_int).unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, AttrValue)> for Attrs {
    fn from_iter<T: IntoIterator<Item = (String, AttrValue)>>(iter: T) -> Self {
        Attrs(iter.into_iter().collect())
    }
}

/// A named, attribute-bearing decoration applied to a run of text.
///
/// Ordering is canonical: name first, attribute values second. Mark sets
/// are stored in a `BTreeSet`, so two sets built in different application
/// orders compare equal and de-duplicate identically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Mark {
    pub name: String,
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(name: impl Into<String>) -> Self {
        Mark {
            name: name.into(),
            attrs: Attrs::new(),
        }
    }

    pub fn with_attrs(name: impl Into<String>, attrs: Attrs) -> Self {
        Mark {
            name: name.into(),
            attrs,
        }
    }
}

/// The set of transient annotation tags attached to a node.
pub type Annotations = BTreeSet<String>;

/// The children of a block; the kind is part of the node's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Children {
    /// A block container: children are further blocks.
    Blocks(Vec<Block>),
    /// A text-bearing leaf block: children are inline content.
    Inlines(Vec<Inline>),
    /// A void block (horizontal rule, image): no children at all.
    None,
}

impl Children {
    pub fn len(&self) -> usize {
        match self {
            Children::Blocks(blocks) => blocks.len(),
            Children::Inlines(inlines) => inlines.len(),
            Children::None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-word description for structural error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Children::Blocks(_) => "blocks",
            Children::Inlines(_) => "inlines",
            Children::None => "void",
        }
    }
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub element: String,
    pub attrs: Attrs,
    pub annotations: Annotations,
    pub children: Children,
}

impl Block {
    pub fn new(element: impl Into<String>, children: Children) -> Self {
        Block {
            element: element.into(),
            attrs: Attrs::new(),
            annotations: Annotations::new(),
            children,
        }
    }

    pub fn with_attrs(element: impl Into<String>, attrs: Attrs, children: Children) -> Self {
        Block {
            element: element.into(),
            attrs,
            annotations: Annotations::new(),
            children,
        }
    }

    /// A block container over block children.
    pub fn container(element: impl Into<String>, children: Vec<Block>) -> Self {
        Block::new(element, Children::Blocks(children))
    }

    /// A text block over inline children.
    pub fn text_block(element: impl Into<String>, children: Vec<Inline>) -> Self {
        Block::new(element, Children::Inlines(children))
    }

    /// A void block with no children.
    pub fn void(element: impl Into<String>) -> Self {
        Block::new(element, Children::None)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Clone the child at `index` as a [`Node`], if in range.
    pub fn get_child(&self, index: usize) -> Option<Node> {
        match &self.children {
            Children::Blocks(blocks) => blocks.get(index).cloned().map(Node::Block),
            Children::Inlines(inlines) => inlines.get(index).cloned().map(Node::Inline),
            Children::None => None,
        }
    }

    pub fn is_annotated(&self, tag: &str) -> bool {
        self.annotations.contains(tag)
    }
}

/// A run of text with canonical marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub attrs: Attrs,
    pub annotations: Annotations,
    pub marks: BTreeSet<Mark>,
    pub text: String,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun {
            attrs: Attrs::new(),
            annotations: Annotations::new(),
            marks: BTreeSet::new(),
            text: text.into(),
        }
    }

    pub fn marked(text: impl Into<String>, marks: BTreeSet<Mark>) -> Self {
        TextRun {
            attrs: Attrs::new(),
            annotations: Annotations::new(),
            marks,
            text: text.into(),
        }
    }

    /// Character (not byte) length, matching selection offset units.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// An inline element with no text content of its own (e.g. a line break).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineLeaf {
    pub element: String,
    pub attrs: Attrs,
    pub annotations: Annotations,
}

impl InlineLeaf {
    pub fn new(element: impl Into<String>) -> Self {
        InlineLeaf {
            element: element.into(),
            attrs: Attrs::new(),
            annotations: Annotations::new(),
        }
    }
}

/// Leaf-level content of a text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inline {
    Text(TextRun),
    Leaf(InlineLeaf),
}

impl Inline {
    pub fn annotations(&self) -> &Annotations {
        match self {
            Inline::Text(run) => &run.annotations,
            Inline::Leaf(leaf) => &leaf.annotations,
        }
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            Inline::Text(run) => &mut run.annotations,
            Inline::Leaf(leaf) => &mut leaf.annotations,
        }
    }
}

/// Any node in the tree: a block or an inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Block(Block),
    Inline(Inline),
}

impl Node {
    /// The element name, if this node has one (text runs do not).
    pub fn element(&self) -> Option<&str> {
        match self {
            Node::Block(block) => Some(&block.element),
            Node::Inline(Inline::Leaf(leaf)) => Some(&leaf.element),
            Node::Inline(Inline::Text(_)) => None,
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Node::Block(block) => &block.annotations,
            Node::Inline(inline) => inline.annotations(),
        }
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            Node::Block(block) => &mut block.annotations,
            Node::Inline(inline) => inline.annotations_mut(),
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Inline(_) => None,
        }
    }

    pub fn into_block(self) -> Option<Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Inline(_) => None,
        }
    }

    /// The end offset of this node in selection units: character count for
    /// text runs, child count for blocks, zero for inline leaves.
    pub fn end_offset(&self) -> usize {
        match self {
            Node::Block(block) => block.child_count(),
            Node::Inline(Inline::Text(run)) => run.char_count(),
            Node::Inline(Inline::Leaf(_)) => 0,
        }
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl From<Inline> for Node {
    fn from(inline: Inline) -> Self {
        Node::Inline(inline)
    }
}
