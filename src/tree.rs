//! Validated resource tree.
//!
//! This module defines the immutable tree produced by parsing a strings
//! file: an ordered forest of [`ResourceNode`]s, each carrying a key,
//! per-language text, and ordered children. Nodes are owned strictly by
//! their parent; the only addressing mechanism is the dotted key path.
//!
//! Trees are normally built by [`crate::parse`], but the constructors are
//! public so the emitters can be exercised against hand-built trees.
//!
//! ```rust
//! use indexmap::IndexMap;
//! use kotoba::tree::{ResourceNode, ResourceTree};
//!
//! let mut texts = IndexMap::new();
//! texts.insert("en".to_owned(), "Hello".to_owned());
//! texts.insert("ja".to_owned(), "こんにちは".to_owned());
//! let root = ResourceNode::branch("ui", IndexMap::new(), vec![
//!     ResourceNode::leaf("greeting", texts),
//! ]);
//! let tree = ResourceTree::new(vec![root], "deadbeef".to_owned());
//! assert!(tree.find("ui.greeting").is_some());
//! ```

use indexmap::IndexMap;

/// Per-language text, keyed by language code in registry order.
pub type NodeTexts = IndexMap<String, String>;

/// One node in a resource tree: a leaf with text, a branch with children,
/// or a branch that also carries its own addressable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNode {
    key: String,
    texts: NodeTexts,
    children: Option<Vec<ResourceNode>>,
}

impl ResourceNode {
    /// Build a leaf node carrying text only.
    #[must_use]
    pub fn leaf(key: impl Into<String>, texts: NodeTexts) -> Self {
        Self {
            key: key.into(),
            texts,
            children: None,
        }
    }

    /// Build a branch node. `texts` may be empty for a pure grouping
    /// branch, or complete when the branch is itself addressable.
    #[must_use]
    pub fn branch(
        key: impl Into<String>,
        texts: NodeTexts,
        children: Vec<ResourceNode>,
    ) -> Self {
        Self {
            key: key.into(),
            texts,
            children: Some(children),
        }
    }

    /// The node's own key (one path segment, not the full dotted path).
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored text for a language code, if any.
    #[must_use]
    pub fn text(&self, code: &str) -> Option<&str> {
        self.texts.get(code).map(String::as_str)
    }

    /// All stored texts in registry order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.texts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether this node carries any text of its own.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.texts.is_empty()
    }

    /// Whether this node is a branch. A branch with an empty child list
    /// is still a branch.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        self.children.is_some()
    }

    /// The node's children in declaration order; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[ResourceNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Immediate child with the given key.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&ResourceNode> {
        self.children().iter().find(|c| c.key == key)
    }

    /// Descend from this node along the given path segments.
    #[must_use]
    pub fn descend<'a, I>(&self, mut segments: I) -> Option<&ResourceNode>
    where
        I: Iterator<Item = &'a str>,
    {
        match segments.next() {
            None => Some(self),
            Some(segment) => self.child(segment)?.descend(segments),
        }
    }
}

/// An immutable, ordered forest of resource nodes stamped with the hash
/// of the source text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTree {
    roots: Vec<ResourceNode>,
    source_hash: String,
}

impl ResourceTree {
    /// Assemble a tree from root nodes and a source fingerprint.
    #[must_use]
    pub fn new(roots: Vec<ResourceNode>, source_hash: String) -> Self {
        Self { roots, source_hash }
    }

    /// Root nodes in declaration order.
    #[must_use]
    pub fn roots(&self) -> &[ResourceNode] {
        &self.roots
    }

    /// Hex fingerprint of the source text this tree was parsed from.
    #[must_use]
    pub fn source_hash(&self) -> &str {
        &self.source_hash
    }

    /// Look up a node by dotted key path.
    ///
    /// The first segment selects a root; every following segment selects
    /// a child of the current node. Returns `None` on any miss.
    #[must_use]
    pub fn find(&self, key_path: &str) -> Option<&ResourceNode> {
        let mut segments = key_path.split('.');
        let first = segments.next()?;
        let root = self.roots.iter().find(|r| r.key == first)?;
        root.descend(segments)
    }
}
