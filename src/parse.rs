//! Strings-file parsing and validation.
//!
//! This module turns raw JSON text into a validated [`ResourceTree`]. The
//! JSON is deserialised into [`crate::ast`] structures first; a second
//! pass validates keys, joins `_long` arrays, and enforces translation
//! completeness against the supplied [`LanguageRegistry`]. Any failure
//! aborts construction — no partial tree is ever returned.

use crate::ast::{RawDocument, RawEntry, TextSource};
use crate::hasher::SourceHasher;
use crate::lang::LanguageRegistry;
use crate::tree::{NodeTexts, ResourceNode, ResourceTree};
use miette::Diagnostic;
use serde_json::Value;
use std::{fs, path::Path};
use thiserror::Error;

mod diagnostics;
mod hints;

pub use diagnostics::{SourceName, SourceText, map_json_error};

/// Errors raised while parsing or validating a strings file.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    /// The document is not well-formed JSON or not an array of objects.
    #[error("strings source is malformed")]
    #[diagnostic(code(kotoba::parse::malformed))]
    MalformedSource {
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },

    /// An entry lacks its `key` field.
    #[error("an entry under '{parent}' is missing its 'key' field")]
    #[diagnostic(code(kotoba::parse::missing_key))]
    MissingKey {
        /// Dotted path of the enclosing entry, or `<root>` at top level.
        parent: String,
    },

    /// A key contains characters outside letters, numbers, `_`, `-`, `.`.
    #[error(
        "'{key}' is not a valid key: only letters, numbers, '_', '-', and '.' are allowed"
    )]
    #[diagnostic(code(kotoba::parse::invalid_key))]
    InvalidKey { key: String },

    /// A language field held something other than a string or an array
    /// of strings.
    #[error("key '{key}': field '{field}' must be a string or an array of strings")]
    #[diagnostic(code(kotoba::parse::invalid_text_field))]
    InvalidTextField { key: String, field: String },

    /// An entry provides text for some registered languages but not all,
    /// or provides neither text nor children.
    #[error(
        "localized string for key '{key}' is incomplete: missing {}; \
         an entry must carry 'strings' or text for every registered language",
        missing.join(", ")
    )]
    #[diagnostic(code(kotoba::parse::incomplete_translation))]
    IncompleteTranslation {
        key: String,
        missing: Vec<String>,
    },
}

/// Normalize a key for identifier use: `-` and `.` become `_`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.replace(['-', '.'], "_")
}

/// Whether a normalized key is usable as an identifier: non-empty and
/// made of letters, numbers, and underscores only.
#[must_use]
pub fn is_valid_identifier(normalized: &str) -> bool {
    !normalized.is_empty()
        && normalized
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
}

/// TitleCase form of a key: the first character uppercased, the
/// remainder unchanged.
#[must_use]
pub fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Parse a strings document using the given registry.
///
/// # Errors
///
/// Returns [`ParseError`] if the JSON fails to parse or any entry fails
/// validation.
pub fn parse_str(
    source: &str,
    registry: &LanguageRegistry,
) -> Result<ResourceTree, ParseError> {
    parse_named(source, "strings.json", registry)
}

fn parse_named(
    source: &str,
    name: &str,
    registry: &LanguageRegistry,
) -> Result<ResourceTree, ParseError> {
    let raw: RawDocument =
        serde_json::from_str(source).map_err(|e| ParseError::MalformedSource {
            source: map_json_error(e, &SourceText::from(source), &SourceName::from(name)),
        })?;
    let roots = build_nodes(&raw, registry, "<root>")?;
    Ok(ResourceTree::new(roots, SourceHasher::hash(source)))
}

/// Load and parse a strings file from the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn from_path(
    path: impl AsRef<Path>,
    registry: &LanguageRegistry,
) -> anyhow::Result<ResourceTree> {
    use anyhow::Context;
    let path_ref = path.as_ref();
    let data = fs::read_to_string(path_ref)
        .with_context(|| format!("failed to read {}", path_ref.display()))?;
    let name = path_ref.display().to_string();
    Ok(parse_named(&data, &name, registry)?)
}

fn build_nodes(
    entries: &[RawEntry],
    registry: &LanguageRegistry,
    parent: &str,
) -> Result<Vec<ResourceNode>, ParseError> {
    entries
        .iter()
        .map(|entry| build_node(entry, registry, parent))
        .collect()
}

fn build_node(
    entry: &RawEntry,
    registry: &LanguageRegistry,
    parent: &str,
) -> Result<ResourceNode, ParseError> {
    let key = entry.key.as_deref().ok_or_else(|| ParseError::MissingKey {
        parent: parent.to_owned(),
    })?;
    validate_key(key)?;

    let texts = collect_texts(entry, key, registry)?;
    check_completeness(entry, key, registry, &texts)?;

    match &entry.strings {
        Some(children) => {
            let path = format!("{parent}.{key}");
            let children = build_nodes(children, registry, &path)?;
            Ok(ResourceNode::branch(key, texts, children))
        }
        None => Ok(ResourceNode::leaf(key, texts)),
    }
}

fn validate_key(key: &str) -> Result<(), ParseError> {
    if !is_valid_identifier(&normalize_key(key)) {
        return Err(ParseError::InvalidKey {
            key: key.to_owned(),
        });
    }
    if key == title_case(key) {
        tracing::warn!(
            key,
            "a TitleCase key was found; this collides with generated grouping names, \
             camelCase is recommended"
        );
    }
    Ok(())
}

fn collect_texts(
    entry: &RawEntry,
    key: &str,
    registry: &LanguageRegistry,
) -> Result<NodeTexts, ParseError> {
    let mut texts = NodeTexts::new();
    for lang in registry.languages() {
        let Some(source) = entry.text_source(&lang.code) else {
            continue;
        };
        let text = match source {
            TextSource::OneLine(value) => value
                .as_str()
                .ok_or_else(|| invalid_field(key, &lang.code))?
                .to_owned(),
            TextSource::MultiLine(value) => {
                let field = format!("{}_long", lang.code);
                let lines = value
                    .as_array()
                    .ok_or_else(|| invalid_field(key, &field))?;
                let separator = if entry.exclude_newline { "" } else { "\n" };
                join_lines(lines, separator).ok_or_else(|| invalid_field(key, &field))?
            }
        };
        texts.insert(lang.code.clone(), text);
    }
    Ok(texts)
}

fn join_lines(lines: &[Value], separator: &str) -> Option<String> {
    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            out.push_str(separator);
        }
        out.push_str(line.as_str()?);
    }
    Some(out)
}

fn invalid_field(key: &str, field: &str) -> ParseError {
    ParseError::InvalidTextField {
        key: key.to_owned(),
        field: field.to_owned(),
    }
}

fn check_completeness(
    entry: &RawEntry,
    key: &str,
    registry: &LanguageRegistry,
    texts: &NodeTexts,
) -> Result<(), ParseError> {
    // A pure branch may omit text entirely; everything else must cover
    // every registered language.
    if texts.is_empty() && entry.strings.is_some() {
        return Ok(());
    }
    let missing: Vec<String> = registry
        .languages()
        .iter()
        .filter(|lang| !texts.contains_key(&lang.code))
        .map(|lang| lang.code.clone())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::IncompleteTranslation {
            key: key.to_owned(),
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("valid_key", "valid_key")]
    #[case("valid-key", "valid_key")]
    #[case("valid.key", "valid_key")]
    fn normalization_folds_dashes_and_periods(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(normalize_key(key), expected);
    }

    #[rstest]
    #[case("valid_key", true)]
    #[case("キー", true)]
    #[case("bad key!", false)]
    #[case("", false)]
    fn identifier_check(#[case] normalized: &str, #[case] expected: bool) {
        assert_eq!(is_valid_identifier(normalized), expected);
    }

    #[rstest]
    #[case("menu", "Menu")]
    #[case("Menu", "Menu")]
    #[case("systemMenu", "SystemMenu")]
    #[case("", "")]
    fn title_case_uppercases_the_first_char(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(title_case(key), expected);
    }
}
