//! Raw strings-file structures.
//!
//! This module defines the serde view of a strings resource file before
//! validation. Entries mirror the JSON schema: a required `key`, optional
//! per-language text fields named by language code (with a `{code}_long`
//! array variant for longer passages), an optional nested `strings` array
//! of child entries, and an `exclude_newline` flag controlling how
//! `_long` arrays are joined.
//!
//! Because the set of language fields depends on the registry in use,
//! they are captured through `#[serde(flatten)]` and interpreted during
//! validation rather than deserialised into fixed fields.
//!
//! ```rust
//! use kotoba::ast::RawEntry;
//!
//! let json = r#"{"key": "greeting", "ja": "やあ", "en": "Hi"}"#;
//! let entry: RawEntry = serde_json::from_str(json).expect("parse");
//! assert_eq!(entry.key.as_deref(), Some("greeting"));
//! assert!(entry.field("en").is_some());
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Top-level document shape: an ordered array of entries.
pub type RawDocument = Vec<RawEntry>;

/// One raw entry in a strings file.
///
/// `key` stays optional here so a missing key surfaces as a validation
/// error with context instead of a serde type error.
#[derive(Debug, Deserialize)]
pub struct RawEntry {
    /// Identifier for this node; dotted paths are built from these.
    pub key: Option<String>,

    /// Child entries, making this entry a branch.
    #[serde(default)]
    pub strings: Option<Vec<RawEntry>>,

    /// When set, `_long` arrays are joined without separating newlines.
    #[serde(default)]
    pub exclude_newline: bool,

    /// Remaining fields, keyed by name in source order. Per-language text
    /// lives here; anything else is ignored by validation.
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

/// Where a language's text came from in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource<'a> {
    /// A plain one-line field, e.g. `"en": "Hello"`.
    OneLine(&'a Value),
    /// A `{code}_long` array field, e.g. `"en_long": ["a", "b"]`.
    MultiLine(&'a Value),
}

impl RawEntry {
    /// Raw value of the named field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The text source for a language code. The one-line field takes
    /// precedence over the `_long` variant when both are present.
    #[must_use]
    pub fn text_source(&self, code: &str) -> Option<TextSource<'_>> {
        if let Some(value) = self.fields.get(code) {
            return Some(TextSource::OneLine(value));
        }
        self.fields
            .get(&format!("{code}_long"))
            .map(TextSource::MultiLine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn one_line_takes_precedence_over_long() {
        let json = r#"{"key": "k", "en": "short", "en_long": ["a", "b"]}"#;
        let entry: RawEntry = serde_json::from_str(json).expect("parse");
        assert!(matches!(
            entry.text_source("en"),
            Some(TextSource::OneLine(_))
        ));
    }

    #[rstest]
    fn long_variant_is_found_when_one_line_is_absent() {
        let json = r#"{"key": "k", "en_long": ["a", "b"]}"#;
        let entry: RawEntry = serde_json::from_str(json).expect("parse");
        assert!(matches!(
            entry.text_source("en"),
            Some(TextSource::MultiLine(_))
        ));
        assert!(entry.text_source("ja").is_none());
    }

    #[rstest]
    fn nested_strings_deserialize_recursively() {
        let json = r#"{"key": "parent", "strings": [{"key": "child", "en": "x", "ja": "y"}]}"#;
        let entry: RawEntry = serde_json::from_str(json).expect("parse");
        let children = entry.strings.expect("children");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].key.as_deref(), Some("child"));
    }
}
