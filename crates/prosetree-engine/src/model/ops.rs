//! # Structural algorithms over the node tree
//!
//! Every operation here is pure: it takes the tree by reference (or by
//! value for consuming rewrites), never mutates it in place, and returns a
//! new tree. The previous tree stays valid, which is what lets embedders
//! keep old states around for undo without any cooperation from this
//! module.
//!
//! Errors follow the taxonomy in [`crate::error`]: bad paths are
//! `Addressing`, kind conflicts are `StructuralMismatch`. No operation
//! swallows a child error.

use crate::error::EditError;
use crate::model::node::{Block, Children, Inline, Node, TextRun};
use crate::path::Path;

fn child_index(raw: i32, len: usize, full: &Path) -> Result<usize, EditError> {
    let index = usize::try_from(raw).map_err(|_| EditError::addressing(full))?;
    if index < len {
        Ok(index)
    } else {
        Err(EditError::addressing(full))
    }
}

/// Descend `root` by `path`, returning the addressed node.
pub fn node_at(root: &Block, path: &Path) -> Option<Node> {
    let mut block = root;
    let mut indices = path.as_slice();
    loop {
        let Some((&raw, rest)) = indices.split_first() else {
            return Some(Node::Block(block.clone()));
        };
        let index = usize::try_from(raw).ok()?;
        match &block.children {
            Children::Blocks(blocks) => {
                block = blocks.get(index)?;
                indices = rest;
            }
            Children::Inlines(inlines) => {
                let inline = inlines.get(index)?;
                // Inline nodes have no addressable children.
                return rest.is_empty().then(|| Node::Inline(inline.clone()));
            }
            Children::None => return None,
        }
    }
}

/// Replace the node at `path` with `node`, returning a new root.
pub fn replace(root: &Block, path: &Path, node: Node) -> Result<Block, EditError> {
    fn rec(block: &Block, indices: &[i32], node: Node, full: &Path) -> Result<Block, EditError> {
        let Some((&raw, rest)) = indices.split_first() else {
            return node.into_block().ok_or_else(|| {
                EditError::mismatch("cannot replace the document root with inline content")
            });
        };
        let mut out = block.clone();
        match &mut out.children {
            Children::Blocks(blocks) => {
                let index = child_index(raw, blocks.len(), full)?;
                if rest.is_empty() {
                    blocks[index] = node.into_block().ok_or_else(|| {
                        EditError::mismatch("cannot place inline content in a block slot")
                    })?;
                } else {
                    blocks[index] = rec(&blocks[index], rest, node, full)?;
                }
            }
            Children::Inlines(inlines) => {
                let index = child_index(raw, inlines.len(), full)?;
                if !rest.is_empty() {
                    return Err(EditError::addressing(full));
                }
                inlines[index] = match node {
                    Node::Inline(inline) => inline,
                    Node::Block(_) => {
                        return Err(EditError::mismatch(
                            "cannot place a block among inline children",
                        ));
                    }
                };
            }
            Children::None => return Err(EditError::addressing(full)),
        }
        Ok(out)
    }
    rec(root, path.as_slice(), node, path)
}

/// Remove the node at `path` and splice `fragment` into its parent's child
/// sequence at that position. An empty fragment is a deletion; a fragment
/// of n > 1 nodes is an expansion.
pub fn replace_with_fragment(
    root: &Block,
    path: &Path,
    fragment: Vec<Node>,
) -> Result<Block, EditError> {
    if path.is_root() {
        return Err(EditError::mismatch(
            "the root has no parent to splice a fragment into",
        ));
    }

    fn rec(
        block: &Block,
        indices: &[i32],
        fragment: Vec<Node>,
        full: &Path,
    ) -> Result<Block, EditError> {
        let Some((&raw, rest)) = indices.split_first() else {
            unreachable!("the root case is rejected before recursion");
        };
        let mut out = block.clone();
        match &mut out.children {
            Children::Blocks(blocks) => {
                let index = child_index(raw, blocks.len(), full)?;
                if rest.is_empty() {
                    let spliced: Vec<Block> = fragment
                        .into_iter()
                        .map(|node| {
                            node.into_block().ok_or_else(|| {
                                EditError::mismatch(
                                    "fragment contains inline content for a block position",
                                )
                            })
                        })
                        .collect::<Result<_, _>>()?;
                    blocks.splice(index..=index, spliced);
                } else {
                    blocks[index] = rec(&blocks[index], rest, fragment, full)?;
                }
            }
            Children::Inlines(inlines) => {
                let index = child_index(raw, inlines.len(), full)?;
                if !rest.is_empty() {
                    return Err(EditError::addressing(full));
                }
                let spliced: Vec<Inline> = fragment
                    .into_iter()
                    .map(|node| match node {
                        Node::Inline(inline) => Ok(inline),
                        Node::Block(_) => Err(EditError::mismatch(
                            "fragment contains a block for an inline position",
                        )),
                    })
                    .collect::<Result<_, _>>()?;
                inlines.splice(index..=index, spliced);
            }
            Children::None => return Err(EditError::addressing(full)),
        }
        Ok(out)
    }
    rec(root, path.as_slice(), fragment, path)
}

/// Merge `b`'s children onto the end of `a`'s children. Both blocks must
/// have the same child kind; inline runs are concatenated with no separator
/// and each run keeps its own marks.
pub fn join_blocks(a: &Block, b: &Block) -> Result<Block, EditError> {
    let mut out = a.clone();
    match (&mut out.children, &b.children) {
        (Children::Blocks(left), Children::Blocks(right)) => {
            left.extend(right.iter().cloned());
        }
        (Children::Inlines(left), Children::Inlines(right)) => {
            left.extend(right.iter().cloned());
        }
        (left, right) => {
            return Err(EditError::mismatch(format!(
                "cannot join {} children with {} children",
                left.kind_name(),
                right.kind_name()
            )));
        }
    }
    Ok(out)
}

/// Walk from `path` upward toward the root (inclusive at both ends),
/// returning the first node satisfying `pred` together with its path.
pub fn find_ancestor<F>(root: &Block, path: &Path, pred: F) -> Option<(Path, Node)>
where
    F: Fn(&Node) -> bool,
{
    let mut current = path.clone();
    loop {
        if let Some(node) = node_at(root, &current)
            && pred(&node)
        {
            return Some((current, node));
        }
        if current.is_root() {
            return None;
        }
        current = current.parent();
    }
}

/// The path (relative to `node`) and value of its last descendant in
/// document order: last child, recursively, until a leaf.
pub fn find_last_path(node: &Node) -> (Path, Node) {
    let mut rel = Path::root();
    let mut current = node.clone();
    loop {
        let next = match &current {
            Node::Block(block) if block.child_count() > 0 => {
                let last = block.child_count() - 1;
                block.get_child(last).map(|child| (last, child))
            }
            _ => None,
        };
        match next {
            Some((index, child)) => {
                rel = rel.child(index as i32);
                current = child;
            }
            None => return (rel, current),
        }
    }
}

/// Bottom-up fragment rewrite: children are rewritten before their parent,
/// each node is replaced by the 0..n nodes `f` produces, and the results
/// are respliced into the parent's child sequence. Inline children pass
/// through untouched.
pub fn concat_map<F>(f: &F, mut block: Block) -> Vec<Block>
where
    F: Fn(Block) -> Vec<Block>,
{
    block.children = match block.children {
        Children::Blocks(children) => Children::Blocks(
            children
                .into_iter()
                .flat_map(|child| concat_map(f, child))
                .collect(),
        ),
        other => other,
    };
    f(block)
}

/// [`concat_map`] constrained to rewrites that keep a single document root.
pub fn rewrite<F>(f: &F, doc: Block) -> Result<Block, EditError>
where
    F: Fn(Block) -> Vec<Block>,
{
    let mut fragment = concat_map(f, doc);
    if fragment.len() == 1 {
        Ok(fragment.remove(0))
    } else {
        Err(EditError::mismatch(format!(
            "rewrite must leave exactly one root, produced {}",
            fragment.len()
        )))
    }
}

/// Split the subtree at `ancestor` into two siblings along the spine down
/// to `leaf`, dividing the addressed node at `offset` (a character offset
/// for text runs, a child index otherwise).
pub fn split_at(
    root: &Block,
    ancestor: &Path,
    leaf: &Path,
    offset: usize,
) -> Result<Block, EditError> {
    let node = node_at(root, ancestor).ok_or_else(|| EditError::addressing(ancestor))?;
    let rel = leaf
        .strip_prefix(ancestor)
        .ok_or_else(|| EditError::addressing(leaf))?;
    let (left, right) = split_node(node, rel, offset, leaf)?;
    replace_with_fragment(root, ancestor, vec![left, right])
}

fn split_node(
    node: Node,
    rel: &[i32],
    offset: usize,
    full: &Path,
) -> Result<(Node, Node), EditError> {
    let Some((&raw, rest)) = rel.split_first() else {
        return split_leaf(node, offset);
    };
    let Node::Block(block) = node else {
        return Err(EditError::addressing(full));
    };
    let Block {
        element,
        attrs,
        annotations,
        children,
    } = block;
    let halves = |left: Children, right: Children| {
        (
            Node::Block(Block {
                element: element.clone(),
                attrs: attrs.clone(),
                annotations: annotations.clone(),
                children: left,
            }),
            Node::Block(Block {
                element: element.clone(),
                attrs: attrs.clone(),
                annotations: annotations.clone(),
                children: right,
            }),
        )
    };
    match children {
        Children::Blocks(children) => {
            let index = child_index(raw, children.len(), full)?;
            let mut left_children = children;
            let mut right_children = left_children.split_off(index);
            let target = right_children.remove(0);
            let (split_l, split_r) = split_node(Node::Block(target), rest, offset, full)?;
            let (split_l, split_r) = match (split_l, split_r) {
                (Node::Block(l), Node::Block(r)) => (l, r),
                _ => {
                    return Err(EditError::mismatch(
                        "split produced inline halves for a block slot",
                    ));
                }
            };
            left_children.push(split_l);
            right_children.insert(0, split_r);
            Ok(halves(
                Children::Blocks(left_children),
                Children::Blocks(right_children),
            ))
        }
        Children::Inlines(children) => {
            let index = child_index(raw, children.len(), full)?;
            if !rest.is_empty() {
                return Err(EditError::addressing(full));
            }
            let mut left_children = children;
            let mut right_children = left_children.split_off(index);
            let target = right_children.remove(0);
            let (split_l, split_r) = split_leaf(Node::Inline(target), offset)?;
            let (split_l, split_r) = match (split_l, split_r) {
                (Node::Inline(l), Node::Inline(r)) => (l, r),
                _ => {
                    return Err(EditError::mismatch(
                        "split produced block halves for an inline slot",
                    ));
                }
            };
            left_children.push(split_l);
            right_children.insert(0, split_r);
            Ok(halves(
                Children::Inlines(left_children),
                Children::Inlines(right_children),
            ))
        }
        Children::None => Err(EditError::addressing(full)),
    }
}

fn split_leaf(node: Node, offset: usize) -> Result<(Node, Node), EditError> {
    match node {
        Node::Inline(Inline::Text(run)) => {
            let byte = char_offset_to_byte(&run.text, offset).ok_or_else(|| {
                EditError::precondition("split offset beyond end of text run")
            })?;
            let (head, tail) = run.text.split_at(byte);
            let left = TextRun {
                text: head.to_string(),
                ..run.clone()
            };
            let right = TextRun {
                text: tail.to_string(),
                ..run
            };
            Ok((Node::Inline(Inline::Text(left)), Node::Inline(Inline::Text(right))))
        }
        Node::Block(block) => {
            // A block offset counts children: divide the child sequence.
            match block.children.clone() {
                Children::Blocks(children) => {
                    if offset > children.len() {
                        return Err(EditError::precondition("split offset beyond child count"));
                    }
                    let mut left_children = children;
                    let right_children = left_children.split_off(offset);
                    Ok((
                        Node::Block(Block {
                            children: Children::Blocks(left_children),
                            ..block.clone()
                        }),
                        Node::Block(Block {
                            children: Children::Blocks(right_children),
                            ..block
                        }),
                    ))
                }
                Children::Inlines(children) => {
                    if offset > children.len() {
                        return Err(EditError::precondition("split offset beyond child count"));
                    }
                    let mut left_children = children;
                    let right_children = left_children.split_off(offset);
                    Ok((
                        Node::Block(Block {
                            children: Children::Inlines(left_children),
                            ..block.clone()
                        }),
                        Node::Block(Block {
                            children: Children::Inlines(right_children),
                            ..block
                        }),
                    ))
                }
                Children::None => Err(EditError::mismatch("cannot split a void block")),
            }
        }
        Node::Inline(Inline::Leaf(_)) => {
            Err(EditError::mismatch("cannot split an inline leaf"))
        }
    }
}

fn char_offset_to_byte(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    let mut seen = 0;
    for (byte, _) in text.char_indices() {
        if seen == offset {
            return Some(byte);
        }
        seen += 1;
    }
    (seen == offset).then_some(text.len())
}

/// Add an annotation tag to the node at `path`.
pub fn add_annotation(root: &Block, path: &Path, tag: &str) -> Result<Block, EditError> {
    let mut node = node_at(root, path).ok_or_else(|| EditError::addressing(path))?;
    node.annotations_mut().insert(tag.to_string());
    replace(root, path, node)
}

/// Strip `tag` from every node in the tree, blocks and inlines alike.
pub fn clear_annotations(root: &Block, tag: &str) -> Block {
    fn clear(block: &mut Block, tag: &str) {
        block.annotations.remove(tag);
        match &mut block.children {
            Children::Blocks(blocks) => {
                for child in blocks {
                    clear(child, tag);
                }
            }
            Children::Inlines(inlines) => {
                for inline in inlines {
                    inline.annotations_mut().remove(tag);
                }
            }
            Children::None => {}
        }
    }
    let mut out = root.clone();
    clear(&mut out, tag);
    out
}

/// Find the first node (in document order) carrying `tag`.
pub fn find_annotated(root: &Block, tag: &str) -> Option<Path> {
    fn rec(block: &Block, tag: &str, prefix: &Path) -> Option<Path> {
        if block.annotations.contains(tag) {
            return Some(prefix.clone());
        }
        match &block.children {
            Children::Blocks(blocks) => {
                for (index, child) in blocks.iter().enumerate() {
                    if let Some(found) = rec(child, tag, &prefix.child(index as i32)) {
                        return Some(found);
                    }
                }
            }
            Children::Inlines(inlines) => {
                for (index, inline) in inlines.iter().enumerate() {
                    if inline.annotations().contains(tag) {
                        return Some(prefix.child(index as i32));
                    }
                }
            }
            Children::None => {}
        }
        None
    }
    rec(root, tag, &Path::root())
}
