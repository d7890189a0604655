//! Key-constant module generator.
//!
//! This module converts a [`ResourceTree`] into a Rust source file
//! declaring one string constant per addressable node, nested in modules
//! that mirror the tree shape. Constants are valued with the node's full
//! dotted key path, so generated code and the strings file can never
//! drift apart silently: the file header embeds the source hash for
//! staleness detection, and output is byte-identical for identical
//! input.

use crate::parse::{is_valid_identifier, normalize_key, title_case};
use crate::tree::{ResourceNode, ResourceTree};
use std::fmt::Write;
use thiserror::Error;

/// Options controlling generated output.
#[derive(Debug, Clone)]
pub struct KeygenOptions {
    /// Optional outer module wrapped around the key module.
    pub namespace: Option<String>,
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for KeygenOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            indent_width: 4,
        }
    }
}

/// Errors raised while generating the key module.
#[derive(Debug, Error)]
pub enum EmitError {
    /// A key still contains non-identifier characters after
    /// normalization. Unreachable for parser-built trees, but the
    /// emitter re-checks because trees can be assembled by hand.
    #[error("key '{key}' cannot be turned into an identifier")]
    InvalidIdentifier { key: String },
}

/// Generate the key-constant module for a tree.
///
/// # Errors
///
/// Returns [`EmitError::InvalidIdentifier`] when a key (or the
/// configured namespace) fails identifier sanitization. Validation runs
/// before any text is produced, so a failed run emits nothing.
pub fn generate(tree: &ResourceTree, options: &KeygenOptions) -> Result<String, EmitError> {
    validate(tree.roots())?;
    let namespace = options
        .namespace
        .as_deref()
        .map(|ns| {
            let sane = normalize_key(ns);
            if is_valid_identifier(&sane) {
                Ok(sane)
            } else {
                Err(EmitError::InvalidIdentifier { key: ns.to_owned() })
            }
        })
        .transpose()?;
    Ok(render(tree, namespace.as_deref(), options.indent_width))
}

fn validate(nodes: &[ResourceNode]) -> Result<(), EmitError> {
    for node in nodes {
        if !is_valid_identifier(&normalize_key(node.key())) {
            return Err(EmitError::InvalidIdentifier {
                key: node.key().to_owned(),
            });
        }
        validate(node.children())?;
    }
    Ok(())
}

/// Pad to the current indentation level.
struct Indent(usize);

impl std::fmt::Display for Indent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:1$}", "", self.0)
    }
}

fn render(tree: &ResourceTree, namespace: Option<&str>, width: usize) -> String {
    let mut out = String::new();
    writeln!(out, "// Auto-generated by kotoba. Any changes will be lost.")
        .expect("write header");
    writeln!(out, "// Source hash: {}", tree.source_hash()).expect("write header");
    writeln!(out, "#![allow(nonstandard_style)]").expect("write header");
    writeln!(out, "#![allow(unused)]").expect("write header");
    writeln!(out).expect("write header");

    let mut indent = 0;
    if let Some(ns) = namespace {
        writeln!(out, "pub mod {ns} {{").expect("write namespace");
        indent += width;
    }

    writeln!(
        out,
        "{}/// Keys in this module can be passed to `I18nContext::handle`.",
        Indent(indent)
    )
    .expect("write key module");
    writeln!(out, "{}pub mod I18nKeys {{", Indent(indent)).expect("write key module");
    render_nodes(&mut out, tree.roots(), indent + width, "", width);
    writeln!(out, "{}}}", Indent(indent)).expect("write key module");

    if namespace.is_some() {
        writeln!(out, "}}").expect("write namespace");
    }
    out
}

fn render_nodes(
    out: &mut String,
    nodes: &[ResourceNode],
    indent: usize,
    prefix: &str,
    width: usize,
) {
    for node in nodes {
        let sane = normalize_key(node.key());
        if node.is_branch() {
            if node.has_text() {
                render_const(out, node, indent, prefix, &sane);
                writeln!(out).expect("write key constant");
            }
            writeln!(
                out,
                "{}pub mod {} {{",
                Indent(indent),
                title_case(&sane)
            )
            .expect("write key module");
            let child_prefix = format!("{prefix}{}.", node.key());
            render_nodes(out, node.children(), indent + width, &child_prefix, width);
            writeln!(out, "{}}}", Indent(indent)).expect("write key module");
            writeln!(out).expect("write key module");
        } else {
            render_const(out, node, indent, prefix, &sane);
        }
    }
}

fn render_const(out: &mut String, node: &ResourceNode, indent: usize, prefix: &str, sane: &str) {
    for (code, text) in node.texts() {
        writeln!(
            out,
            "{}/// {code}: {}<br/>",
            Indent(indent),
            summarize(text)
        )
        .expect("write key constant");
    }
    writeln!(
        out,
        "{}pub const {sane}: &str = \"{prefix}{}\";",
        Indent(indent),
        node.key()
    )
    .expect("write key constant");
}

/// One-line documentation summary: newlines flattened, truncated to 30
/// characters, markup-significant angle brackets escaped.
fn summarize(text: &str) -> String {
    let flat = text.replace('\n', " ");
    let truncated = if flat.chars().count() > 30 {
        let head: String = flat.chars().take(30).collect();
        format!("{head}...")
    } else {
        flat
    };
    truncated.replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeTexts, ResourceNode, ResourceTree};
    use rstest::rstest;

    fn texts(pairs: &[(&str, &str)]) -> NodeTexts {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[rstest]
    fn generate_simple_module() {
        let leaf = ResourceNode::leaf("greeting", texts(&[("ja", "やあ"), ("en", "Hi")]));
        let root = ResourceNode::branch("ui", NodeTexts::new(), vec![leaf]);
        let tree = ResourceTree::new(vec![root], "cafe".to_owned());

        let generated = generate(&tree, &KeygenOptions::default()).expect("generate");
        let expected = concat!(
            "// Auto-generated by kotoba. Any changes will be lost.\n",
            "// Source hash: cafe\n",
            "#![allow(nonstandard_style)]\n",
            "#![allow(unused)]\n",
            "\n",
            "/// Keys in this module can be passed to `I18nContext::handle`.\n",
            "pub mod I18nKeys {\n",
            "    pub mod Ui {\n",
            "        /// ja: やあ<br/>\n",
            "        /// en: Hi<br/>\n",
            "        pub const greeting: &str = \"ui.greeting\";\n",
            "    }\n",
            "\n",
            "}\n",
        );
        assert_eq!(generated, expected);
    }

    #[rstest]
    fn branch_with_text_gets_its_own_constant() {
        let child = ResourceNode::leaf("child", texts(&[("en", "c")]));
        let root = ResourceNode::branch("top", texts(&[("en", "t")]), vec![child]);
        let tree = ResourceTree::new(vec![root], "00".to_owned());

        let generated = generate(&tree, &KeygenOptions::default()).expect("generate");
        assert!(generated.contains("pub const top: &str = \"top\";"));
        assert!(generated.contains("pub mod Top {"));
        assert!(generated.contains("pub const child: &str = \"top.child\";"));
    }

    #[rstest]
    fn long_text_is_truncated_with_ellipsis() {
        assert_eq!(
            summarize("abcdefghijklmnopqrstuvwxyzabcdefghij"),
            "abcdefghijklmnopqrstuvwxyzabcd..."
        );
    }

    #[rstest]
    fn angle_brackets_are_escaped_after_truncation() {
        assert_eq!(summarize("<b>bold</b>"), "&lt;b&gt;bold&lt;/b&gt;");
    }

    #[rstest]
    fn newlines_flatten_to_spaces_in_summaries() {
        assert_eq!(summarize("a\nb"), "a b");
    }

    #[rstest]
    fn invalid_key_in_hand_built_tree_is_rejected() {
        let node = ResourceNode::leaf("bad key!", texts(&[("en", "x")]));
        let tree = ResourceTree::new(vec![node], "00".to_owned());
        let err = generate(&tree, &KeygenOptions::default()).expect_err("must fail");
        assert!(matches!(err, EmitError::InvalidIdentifier { .. }));
    }

    #[rstest]
    fn namespace_wraps_the_key_module() {
        let node = ResourceNode::leaf("k", texts(&[("en", "x")]));
        let tree = ResourceTree::new(vec![node], "00".to_owned());
        let options = KeygenOptions {
            namespace: Some("app_keys".to_owned()),
            indent_width: 4,
        };
        let generated = generate(&tree, &options).expect("generate");
        assert!(generated.contains("pub mod app_keys {"));
        assert!(generated.contains("    pub mod I18nKeys {"));
    }
}
