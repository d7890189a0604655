//! Supported-language registry.
//!
//! A registry is the ordered set of languages every translated node in a
//! strings file must cover. It is loaded once per process from a JSON
//! document and never mutated afterwards; when no registry file is given,
//! the built-in `ja`/`en` pair is used.
//!
//! The following example shows how to load a registry from a string:
//!
//! ```rust
//! use kotoba::lang::LanguageRegistry;
//!
//! let json = r#"[
//!     {"id": 0, "code": "ja", "display": "日本語"},
//!     {"id": 1, "code": "en", "display": "English"}
//! ]"#;
//! let registry = LanguageRegistry::from_str(json).expect("parse");
//! assert_eq!(registry.len(), 2);
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

/// Position of a language within its registry.
///
/// Ids are assigned by configuration order and act as the typed handle for
/// per-language storage, replacing free-form string lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageId(pub u16);

/// A single supported language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Language {
    /// Numeric identifier, unique within the registry.
    pub id: u16,
    /// Short code used as the field name in strings files, e.g. `en`.
    pub code: String,
    /// Human-readable name shown in language pickers, e.g. `English`.
    pub display: String,
}

/// Errors raised while loading or validating a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry document failed to parse.
    #[error("language registry is malformed")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    /// The registry declares no languages at all.
    #[error("language registry declares no languages")]
    Empty,

    /// A language entry has an empty code.
    #[error("language entry {index} has an empty code")]
    EmptyCode { index: usize },

    /// Two entries share the same code.
    #[error("language code '{code}' is declared more than once")]
    DuplicateCode { code: String },

    /// Two entries share the same id.
    #[error("language id {id} is declared more than once")]
    DuplicateId { id: u16 },

    /// The designated fallback code is not in the registry.
    #[error("fallback language '{code}' is not a registered language")]
    UnknownFallback { code: String },
}

/// Registry document shape: either a bare array of languages or an object
/// carrying the array plus an explicit fallback code.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRegistry {
    List(Vec<Language>),
    Wrapped {
        languages: Vec<Language>,
        #[serde(default)]
        fallback: Option<String>,
    },
}

/// Ordered, immutable set of supported languages with a designated
/// fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    fallback: usize,
}

impl LanguageRegistry {
    /// Build a registry from an ordered language list and an optional
    /// fallback code. When no fallback is given, the first entry is used.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the list is empty, a code is empty
    /// or duplicated, an id is duplicated, or the fallback code is not in
    /// the list.
    pub fn new(
        languages: Vec<Language>,
        fallback: Option<&str>,
    ) -> Result<Self, RegistryError> {
        if languages.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (index, lang) in languages.iter().enumerate() {
            if lang.code.is_empty() {
                return Err(RegistryError::EmptyCode { index });
            }
            for earlier in languages.iter().take(index) {
                if earlier.code == lang.code {
                    return Err(RegistryError::DuplicateCode {
                        code: lang.code.clone(),
                    });
                }
                if earlier.id == lang.id {
                    return Err(RegistryError::DuplicateId { id: lang.id });
                }
            }
        }
        let fallback_index = match fallback {
            Some(code) => languages
                .iter()
                .position(|l| l.code == code)
                .ok_or_else(|| RegistryError::UnknownFallback {
                    code: code.to_owned(),
                })?,
            None => 0,
        };
        Ok(Self {
            languages,
            fallback: fallback_index,
        })
    }

    /// Parse a registry from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the JSON fails to parse or the
    /// language set fails validation.
    #[allow(
        clippy::should_implement_trait,
        reason = "serde-style constructor; FromStr's trait bound adds nothing here"
    )]
    pub fn from_str(json: &str) -> Result<Self, RegistryError> {
        let raw: RawRegistry = serde_json::from_str(json)
            .map_err(|source| RegistryError::Malformed { source })?;
        match raw {
            RawRegistry::List(languages) => Self::new(languages, None),
            RawRegistry::Wrapped {
                languages,
                fallback,
            } => Self::new(languages, fallback.as_deref()),
        }
    }

    /// Load a registry from the given file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let data = fs::read_to_string(path_ref)
            .with_context(|| format!("failed to read {}", path_ref.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("loading language registry at {}", path_ref.display()))
    }

    /// All registered languages, in configuration order.
    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Look up a language by its short code.
    #[must_use]
    pub fn language(&self, code: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.code == code)
    }

    /// The typed position of a code within the registry.
    #[must_use]
    pub fn id_of(&self, code: &str) -> Option<LanguageId> {
        self.languages
            .iter()
            .position(|l| l.code == code)
            .and_then(|i| u16::try_from(i).ok())
            .map(LanguageId)
    }

    /// The language substituted when a requested language has no text.
    #[must_use]
    pub fn fallback(&self) -> &Language {
        // new() guarantees a non-empty list and an in-range index.
        &self.languages[self.fallback]
    }

    /// Number of registered languages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Whether the registry is empty. Always false for a constructed
    /// registry; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl Default for LanguageRegistry {
    /// The built-in registry: `ja` and `en`, with `en` as the fallback.
    fn default() -> Self {
        Self {
            languages: vec![
                Language {
                    id: 0,
                    code: "ja".to_owned(),
                    display: "日本語".to_owned(),
                },
                Language {
                    id: 1,
                    code: "en".to_owned(),
                    display: "English".to_owned(),
                },
            ],
            fallback: 1,
        }
    }
}
