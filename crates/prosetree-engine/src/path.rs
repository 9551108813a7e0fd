//! # Path addressing
//!
//! A [`Path`] addresses a node by the sequence of child indices leading to
//! it from the document root; the empty path is the root itself. Paths
//! compare lexicographically, which matches document order (a parent sorts
//! before its descendants, earlier siblings before later ones).
//!
//! Paths are transient values. They are recomputed on every query and must
//! never be stored as stable identifiers across edits: any structural edit
//! can invalidate every path in the tree. Position tracking across rewrites
//! uses annotations instead (see `editing::selection`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered sequence of child indices from the document root.
///
/// Indices are signed so that [`Path::decrement`] can produce the
/// deliberately out-of-range sibling `-1`; callers validate before
/// dereferencing, they are never auto-clamped.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Path(Vec<i32>);

impl Path {
    /// The root path (empty sequence).
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn new(indices: Vec<i32>) -> Self {
        Path(indices)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// The last index, if any.
    pub fn last(&self) -> Option<i32> {
        self.0.last().copied()
    }

    /// The path extended by one child index.
    pub fn child(&self, index: i32) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Path(indices)
    }

    /// Drop the last index. The root is its own parent (a fixed point, not
    /// an error).
    pub fn parent(&self) -> Path {
        match self.0.split_last() {
            Some((_, init)) => Path(init.to_vec()),
            None => Path::root(),
        }
    }

    /// The next sibling path (last index + 1). The root is returned
    /// unchanged.
    pub fn increment(&self) -> Path {
        self.adjust_last(1)
    }

    /// The previous sibling path (last index - 1). The root is returned
    /// unchanged. Decrementing an index of 0 yields -1, an out-of-range
    /// sibling the caller must validate before dereferencing.
    pub fn decrement(&self) -> Path {
        self.adjust_last(-1)
    }

    fn adjust_last(&self, delta: i32) -> Path {
        let mut indices = self.0.clone();
        match indices.last_mut() {
            Some(last) => *last += delta,
            None => return Path::root(),
        }
        Path(indices)
    }

    /// Longest common prefix of two paths.
    pub fn common_ancestor(&self, other: &Path) -> Path {
        let prefix: Vec<i32> = self
            .0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect();
        Path(prefix)
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The suffix below `prefix`, or `None` if `prefix` is not an ancestor.
    pub fn strip_prefix(&self, prefix: &Path) -> Option<&[i32]> {
        self.0.strip_prefix(prefix.0.as_slice())
    }

    /// Concatenate a relative suffix onto this path.
    pub fn join(&self, suffix: &Path) -> Path {
        let mut indices = self.0.clone();
        indices.extend_from_slice(&suffix.0);
        Path(indices)
    }
}

impl fmt::Display for Path {
    /// Indices joined with `:`; the root path renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for index in &self.0 {
            if !first {
                write!(f, ":")?;
            }
            write!(f, "{index}")?;
            first = false;
        }
        Ok(())
    }
}

impl From<Vec<i32>> for Path {
    fn from(indices: Vec<i32>) -> Self {
        Path(indices)
    }
}

impl From<&[i32]> for Path {
    fn from(indices: &[i32]) -> Self {
        Path(indices.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn path(indices: &[i32]) -> Path {
        Path::from(indices)
    }

    #[rstest]
    #[case(&[0, 1], &[0, 2])]
    #[case(&[3], &[4])]
    #[case(&[], &[])]
    fn increment_adjusts_only_the_last_index(#[case] input: &[i32], #[case] expected: &[i32]) {
        assert_eq!(path(input).increment(), path(expected));
    }

    #[rstest]
    #[case(&[0, 2], &[0, 1])]
    #[case(&[0, 0], &[0, -1])]
    #[case(&[], &[])]
    fn decrement_adjusts_only_the_last_index(#[case] input: &[i32], #[case] expected: &[i32]) {
        assert_eq!(path(input).decrement(), path(expected));
    }

    #[rstest]
    #[case(&[0, 1], &[0])]
    #[case(&[5], &[])]
    #[case(&[], &[])]
    fn parent_drops_the_last_index(#[case] input: &[i32], #[case] expected: &[i32]) {
        assert_eq!(path(input).parent(), path(expected));
    }

    #[rstest]
    #[case(&[], &[0, 1], &[])]
    #[case(&[0], &[0, 1], &[0])]
    #[case(&[0, 2], &[0, 1], &[0])]
    #[case(&[0, 1, 2, 3, 4], &[0, 1, 3, 2, 4], &[0, 1])]
    fn common_ancestor_is_the_longest_common_prefix(
        #[case] a: &[i32],
        #[case] b: &[i32],
        #[case] expected: &[i32],
    ) {
        assert_eq!(path(a).common_ancestor(&path(b)), path(expected));
        assert_eq!(path(b).common_ancestor(&path(a)), path(expected));
    }

    #[rstest]
    #[case(&[], "")]
    #[case(&[1], "1")]
    #[case(&[1, 3, 0], "1:3:0")]
    fn display_joins_indices_with_colons(#[case] input: &[i32], #[case] expected: &str) {
        assert_eq!(path(input).to_string(), expected);
    }

    #[test]
    fn ordering_matches_document_order() {
        // Parent before child, earlier sibling before later subtree.
        assert!(path(&[0]) < path(&[0, 1]));
        assert!(path(&[0, 1]) < path(&[0, 2]));
        assert!(path(&[0, 9, 9]) < path(&[1]));
    }

    #[test]
    fn strip_prefix_yields_the_relative_suffix() {
        assert_eq!(path(&[0, 1, 2]).strip_prefix(&path(&[0, 1])), Some(&[2][..]));
        assert_eq!(path(&[0, 1]).strip_prefix(&path(&[1])), None);
        assert_eq!(path(&[0]).strip_prefix(&path(&[])), Some(&[0][..]));
    }
}
