//! Character-inventory extraction.
//!
//! Walks every node's text across every language and produces the set of
//! distinct characters in use, for glyph-atlas provisioning. The result
//! is deduplicated and deterministically ordered: the numeric seed (when
//! enabled), then each language's display-name characters in registry
//! order, then tree-derived characters in sorted order, then the
//! compatibility set.

use crate::lang::LanguageRegistry;
use crate::tree::{ResourceNode, ResourceTree};
use indexmap::IndexSet;
use itertools::Itertools;
use std::collections::BTreeSet;

/// Digits and numeric punctuation seeded by `include_numeric_set`.
pub const NUMERIC_SET: &str = "0123456789+-.,";

/// Characters required by text-rendering tooling regardless of content.
pub const COMPAT_SET: &str = "()_";

/// Options controlling charset output.
#[derive(Debug, Clone, Default)]
pub struct CharsetOptions {
    /// Seed the output with [`NUMERIC_SET`], excluding those characters
    /// from the tree-derived portion.
    pub include_numeric_set: bool,
}

/// Every distinct character used in the tree's text, newline excluded,
/// in sorted order.
#[must_use]
pub fn collect_chars(tree: &ResourceTree) -> BTreeSet<char> {
    let mut set = BTreeSet::new();
    for root in tree.roots() {
        collect_node(root, &mut set);
    }
    set
}

fn collect_node(node: &ResourceNode, set: &mut BTreeSet<char>) {
    for (_, text) in node.texts() {
        set.extend(text.chars().filter(|c| *c != '\n'));
    }
    for child in node.children() {
        collect_node(child, set);
    }
}

/// Generate the charset string for a tree.
///
/// When a registry is supplied, each language's display-name characters
/// are included so UI elements that render language names stay covered.
#[must_use]
pub fn generate(
    tree: &ResourceTree,
    registry: Option<&LanguageRegistry>,
    options: &CharsetOptions,
) -> String {
    let mut chars: IndexSet<char> = IndexSet::new();
    if options.include_numeric_set {
        chars.extend(NUMERIC_SET.chars());
    }
    if let Some(registry) = registry {
        for lang in registry.languages() {
            chars.extend(lang.display.chars());
        }
    }
    let mut tree_chars = collect_chars(tree);
    if options.include_numeric_set {
        tree_chars.retain(|c| !NUMERIC_SET.contains(*c));
    }
    chars.extend(tree_chars);
    chars.extend(COMPAT_SET.chars());
    chars.iter().join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeTexts, ResourceNode, ResourceTree};
    use rstest::rstest;

    fn tree_with(texts: &[(&str, &str)]) -> ResourceTree {
        let map: NodeTexts = texts
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ResourceTree::new(vec![ResourceNode::leaf("k", map)], "00".to_owned())
    }

    #[rstest]
    fn newline_is_never_collected() {
        let tree = tree_with(&[("en", "a\nb")]);
        let set = collect_chars(&tree);
        assert!(!set.contains(&'\n'));
        assert!(set.contains(&'a') && set.contains(&'b'));
    }

    #[rstest]
    fn output_contains_no_duplicates() {
        let tree = tree_with(&[("en", "aa(bb)"), ("ja", "ab")]);
        let out = generate(&tree, None, &CharsetOptions::default());
        let unique: IndexSet<char> = out.chars().collect();
        assert_eq!(out.chars().count(), unique.len());
    }

    #[rstest]
    fn numeric_seed_comes_first_and_is_not_repeated() {
        let tree = tree_with(&[("en", "room 101")]);
        let out = generate(
            &tree,
            None,
            &CharsetOptions {
                include_numeric_set: true,
            },
        );
        assert!(out.starts_with(NUMERIC_SET));
        assert_eq!(out.matches('0').count(), 1);
        assert_eq!(out.matches('1').count(), 1);
    }

    #[rstest]
    fn compatibility_set_is_always_present() {
        let tree = tree_with(&[("en", "x")]);
        let out = generate(&tree, None, &CharsetOptions::default());
        for c in COMPAT_SET.chars() {
            assert!(out.contains(c), "missing {c}");
        }
    }
}
