//! Integration tests for the character-inventory emitter.

mod common;

use common::sample_tree;
use kotoba::charset::{self, CharsetOptions, COMPAT_SET, NUMERIC_SET};
use kotoba::lang::LanguageRegistry;
use rstest::rstest;

#[rstest]
fn output_is_stable_across_runs() {
    let tree = sample_tree();
    let registry = LanguageRegistry::default();
    let options = CharsetOptions::default();
    let first = charset::generate(&tree, Some(&registry), &options);
    let second = charset::generate(&tree, Some(&registry), &options);
    assert_eq!(first, second);
}

#[rstest]
fn tree_characters_are_collected_across_languages() {
    let tree = sample_tree();
    let out = charset::generate(&tree, None, &CharsetOptions::default());
    for c in ['H', 'G', 'さ', 'こ', '{', '}'] {
        assert!(out.contains(c), "missing {c}");
    }
}

#[rstest]
fn newline_never_appears_even_from_long_arrays() {
    let tree = sample_tree();
    let out = charset::generate(&tree, None, &CharsetOptions::default());
    assert!(!out.contains('\n'));
}

#[rstest]
fn display_name_characters_are_included_with_a_registry() {
    let tree = sample_tree();
    let registry = LanguageRegistry::default();
    let out = charset::generate(&tree, Some(&registry), &CharsetOptions::default());
    for c in "日本語English".chars() {
        assert!(out.contains(c), "missing {c}");
    }
}

#[rstest]
fn numeric_seed_dedupes_against_tree_characters() {
    let tree = sample_tree();
    let options = CharsetOptions {
        include_numeric_set: true,
    };
    let out = charset::generate(&tree, None, &options);
    assert!(out.starts_with(NUMERIC_SET));
    // "line1\nline2" contributes digits; they must not repeat.
    for c in NUMERIC_SET.chars() {
        assert_eq!(out.matches(c).count(), 1, "duplicated {c}");
    }
}

#[rstest]
fn compatibility_set_appears_exactly_once() {
    let tree = sample_tree();
    let out = charset::generate(&tree, None, &CharsetOptions::default());
    for c in COMPAT_SET.chars() {
        assert_eq!(out.matches(c).count(), 1, "duplicated {c}");
    }
}

#[rstest]
fn no_duplicates_anywhere() {
    let tree = sample_tree();
    let registry = LanguageRegistry::default();
    let out = charset::generate(
        &tree,
        Some(&registry),
        &CharsetOptions {
            include_numeric_set: true,
        },
    );
    let mut seen = std::collections::HashSet::new();
    for c in out.chars() {
        assert!(seen.insert(c), "duplicated {c}");
    }
}
