//! # Rendered-tree representation
//!
//! The engine never talks to a real rendering layer directly. Everything it
//! knows about the rendered side of the editor goes through exactly one sum
//! type: [`RenderedNode`]. An element carries a tag name, an ordered list of
//! string attribute pairs, and an ordered child sequence; a text node carries
//! a string. Nothing else exists at this boundary.
//!
//! Keeping the type this small is deliberate: node and mark codecs in the
//! engine translate to and from *only* this representation, so any rendering
//! backend (a browser DOM bridge, a test harness, a serializer) only has to
//! produce and consume these two variants.

use serde::{Deserialize, Serialize};

/// A node in the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderedNode {
    /// An element with a tag name, ordered attributes, and children.
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<RenderedNode>,
    },
    /// A run of text.
    Text(String),
}

impl RenderedNode {
    /// Build an element with no attributes.
    pub fn element(tag: impl Into<String>, children: Vec<RenderedNode>) -> Self {
        RenderedNode::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children,
        }
    }

    /// Build an element with attributes.
    pub fn element_with_attrs<K, V>(
        tag: impl Into<String>,
        attrs: impl IntoIterator<Item = (K, V)>,
        children: Vec<RenderedNode>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RenderedNode::Element {
            tag: tag.into(),
            attrs: attrs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            children,
        }
    }

    /// Build a text node.
    pub fn text(text: impl Into<String>) -> Self {
        RenderedNode::Text(text.into())
    }

    /// The tag name, if this is an element.
    pub fn tag(&self) -> Option<&str> {
        match self {
            RenderedNode::Element { tag, .. } => Some(tag),
            RenderedNode::Text(_) => None,
        }
    }

    /// Look up an attribute value by name (first match wins).
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            RenderedNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            RenderedNode::Text(_) => None,
        }
    }

    /// Child nodes; empty for text nodes.
    pub fn children(&self) -> &[RenderedNode] {
        match self {
            RenderedNode::Element { children, .. } => children,
            RenderedNode::Text(_) => &[],
        }
    }

    /// Number of children; zero for text nodes.
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn is_text(&self) -> bool {
        matches!(self, RenderedNode::Text(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attr_lookup_finds_first_match() {
        let node = RenderedNode::element_with_attrs(
            "a",
            vec![("href", "https://example.com"), ("href", "shadowed")],
            vec![],
        );
        assert_eq!(node.attr("href"), Some("https://example.com"));
        assert_eq!(node.attr("title"), None);
    }

    #[test]
    fn text_nodes_have_no_structure() {
        let node = RenderedNode::text("hello");
        assert_eq!(node.tag(), None);
        assert_eq!(node.attr("anything"), None);
        assert_eq!(node.children(), &[]);
        assert!(node.is_text());
    }

    #[test]
    fn children_are_ordered() {
        let node = RenderedNode::element(
            "p",
            vec![RenderedNode::text("a"), RenderedNode::text("b")],
        );
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.children()[0], RenderedNode::text("a"));
        assert_eq!(node.children()[1], RenderedNode::text("b"));
    }
}
