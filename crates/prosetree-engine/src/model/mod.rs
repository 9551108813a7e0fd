pub mod node;
pub mod ops;

pub use node::{
    Annotations, AttrValue, Attrs, Block, Children, Inline, InlineLeaf, Mark, Node, TextRun,
};
