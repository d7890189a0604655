//! Key-path resolution and token substitution.
//!
//! The resolver walks a [`ResourceTree`] by dotted key path, selects the
//! requested language's text (falling back to the registry's designated
//! fallback when the requested language is absent on an otherwise
//! translated node), unescapes literal `\n` sequences, and applies
//! `{token}` substitution.
//!
//! Two surfaces are exposed: the strict functions in this module, which
//! return [`ResolveError`], and the permissive [`I18nContext`] /
//! [`StringHandle`] pair, which degrades lookup misses into visibly
//! wrong sentinel strings so a broken key breaks one label rather than
//! the whole caller.

use crate::lang::LanguageRegistry;
use crate::tree::{ResourceNode, ResourceTree};
use indexmap::IndexMap;
use thiserror::Error;

/// Sentinel returned by the permissive API when a key fails to resolve.
const NOT_LOCALIZED: &str = "not localized!!!!!";

/// Sentinel returned by the permissive API for an empty key.
const NO_KEY: &str = "No localization key specified!!!!!";

/// Errors raised during key resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No node exists at the path, or the terminal node has no text
    /// usable for the requested language.
    #[error("key '{path}' could not be found")]
    KeyNotFound { path: String },

    /// Children were requested on a node that has none.
    #[error("key '{path}' is not a branch and has no children")]
    NotABranch { path: String },

    /// The requested language code is not in the registry.
    #[error("language '{code}' is not registered")]
    UnknownLanguage { code: String },

    /// Token substitution failed on otherwise resolvable text.
    #[error("substituting into '{path}' failed")]
    Substitution {
        path: String,
        #[source]
        source: SubstitutionError,
    },
}

/// Errors raised by the `{token}` substitution scanner.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubstitutionError {
    /// The text used a token with no matching substitution entry.
    #[error("no value provided for token '{{{0}}}'")]
    MissingToken(String),

    /// A `{` was never closed.
    #[error("unmatched '{{' in format string")]
    UnterminatedToken,

    /// A `}` appeared outside any token.
    #[error("unmatched '}}' in format string")]
    StrayClose,
}

/// Ordered name/value pairs for `{token}` replacement.
///
/// # Examples
///
/// ```rust
/// use kotoba::resolve::{Substitutions, substitute};
///
/// let subs = Substitutions::new().with("name", "World");
/// assert_eq!(substitute("Hello, {name}!", &subs).expect("substitute"), "Hello, World!");
/// ```
#[derive(Debug, Default, Clone)]
pub struct Substitutions {
    values: IndexMap<String, String>,
}

impl Substitutions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a named value. Accepts anything printable.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    /// Value for a token name, if provided.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Replace every `{name}` token in `input` with its substitution value.
///
/// `{{` and `}}` escape to literal braces. Entries in `subs` that the
/// text never references are ignored.
///
/// # Errors
///
/// Returns [`SubstitutionError`] for a token with no matching entry, an
/// unclosed `{`, or a stray `}`.
pub fn substitute(input: &str, subs: &Substitutions) -> Result<String, SubstitutionError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut token = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(tc) => token.push(tc),
                        None => return Err(SubstitutionError::UnterminatedToken),
                    }
                }
                let value = subs
                    .get(&token)
                    .ok_or(SubstitutionError::MissingToken(token))?;
                out.push_str(value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(SubstitutionError::StrayClose),
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Turn literal two-character `\n` sequences into physical newlines.
#[must_use]
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn find_node<'a>(tree: &'a ResourceTree, key_path: &str) -> Result<&'a ResourceNode, ResolveError> {
    tree.find(key_path).ok_or_else(|| ResolveError::KeyNotFound {
        path: key_path.to_owned(),
    })
}

/// Select the stored text for `code`, falling back to the registry's
/// fallback language when the node is translated but misses `code`.
fn select_text<'a>(
    node: &'a ResourceNode,
    registry: &LanguageRegistry,
    code: &str,
) -> Option<&'a str> {
    node.text(code)
        .or_else(|| node.text(&registry.fallback().code))
}

/// Resolve a dotted key path to localized text.
///
/// # Errors
///
/// Returns [`ResolveError::UnknownLanguage`] for an unregistered code,
/// [`ResolveError::KeyNotFound`] when the path misses or no usable text
/// exists, and [`ResolveError::Substitution`] when token replacement
/// fails.
pub fn resolve(
    tree: &ResourceTree,
    registry: &LanguageRegistry,
    code: &str,
    key_path: &str,
    subs: Option<&Substitutions>,
) -> Result<String, ResolveError> {
    if registry.language(code).is_none() {
        return Err(ResolveError::UnknownLanguage {
            code: code.to_owned(),
        });
    }
    let node = find_node(tree, key_path)?;
    let raw = select_text(node, registry, code).ok_or_else(|| ResolveError::KeyNotFound {
        path: key_path.to_owned(),
    })?;
    let text = unescape_newlines(raw);
    match subs {
        Some(subs) => {
            substitute(&text, subs).map_err(|source| ResolveError::Substitution {
                path: key_path.to_owned(),
                source,
            })
        }
        None => Ok(text),
    }
}

/// Immediate child keys of the node at `key_path`, in declaration order.
///
/// # Errors
///
/// Returns [`ResolveError::KeyNotFound`] when the path misses and
/// [`ResolveError::NotABranch`] when the node is a leaf.
pub fn child_keys(tree: &ResourceTree, key_path: &str) -> Result<Vec<String>, ResolveError> {
    let node = find_node(tree, key_path)?;
    if !node.is_branch() {
        return Err(ResolveError::NotABranch {
            path: key_path.to_owned(),
        });
    }
    Ok(node
        .children()
        .iter()
        .map(|c| c.key().to_owned())
        .collect())
}

/// Explicitly constructed resolution context: one tree, one registry,
/// one currently selected language.
///
/// The current language is ordinary state on this value rather than a
/// process-wide global, so independent contexts can coexist.
#[derive(Debug, Clone)]
pub struct I18nContext {
    tree: ResourceTree,
    registry: LanguageRegistry,
    current: String,
}

impl I18nContext {
    /// Build a context; the current language starts at the registry's
    /// fallback.
    #[must_use]
    pub fn new(tree: ResourceTree, registry: LanguageRegistry) -> Self {
        let current = registry.fallback().code.clone();
        Self {
            tree,
            registry,
            current,
        }
    }

    /// Switch the current language.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownLanguage`] for an unregistered
    /// code; the current language is left unchanged.
    pub fn set_language(&mut self, code: &str) -> Result<(), ResolveError> {
        if self.registry.language(code).is_none() {
            return Err(ResolveError::UnknownLanguage {
                code: code.to_owned(),
            });
        }
        self.current = code.to_owned();
        Ok(())
    }

    /// The currently selected language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.current
    }

    #[must_use]
    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    #[must_use]
    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// A handle on the string at `key`. The lookup is deferred until the
    /// handle is read, so handles for not-yet-existing keys are cheap.
    #[must_use]
    pub fn handle(&self, key: impl Into<String>) -> StringHandle<'_> {
        StringHandle {
            ctx: self,
            key: key.into(),
        }
    }
}

/// A deferred lookup of one localized string.
#[derive(Debug, Clone)]
pub struct StringHandle<'a> {
    ctx: &'a I18nContext,
    key: String,
}

impl StringHandle<'_> {
    /// The dotted key path this handle addresses.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolve in the current language, degrading misses to sentinel
    /// strings instead of failing.
    #[must_use]
    pub fn text(&self) -> String {
        if self.key.is_empty() {
            return NO_KEY.to_owned();
        }
        self.try_text()
            .unwrap_or_else(|_| format!("String {} {NOT_LOCALIZED}", self.key))
    }

    /// Resolve with substitutions. Lookup misses degrade to the
    /// sentinel, but a substitution failure is a programming error and
    /// stays an error.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Substitution`] when token replacement
    /// fails on resolvable text.
    pub fn text_with(&self, subs: &Substitutions) -> Result<String, ResolveError> {
        if self.key.is_empty() {
            return Ok(NO_KEY.to_owned());
        }
        match self.try_text_with(subs) {
            Ok(text) => Ok(text),
            Err(err @ ResolveError::Substitution { .. }) => Err(err),
            Err(_) => Ok(format!("String {} {NOT_LOCALIZED}", self.key)),
        }
    }

    /// Strict resolution in the current language.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on any miss.
    pub fn try_text(&self) -> Result<String, ResolveError> {
        resolve(
            &self.ctx.tree,
            &self.ctx.registry,
            &self.ctx.current,
            &self.key,
            None,
        )
    }

    /// Strict resolution with substitutions.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on any miss or substitution failure.
    pub fn try_text_with(&self, subs: &Substitutions) -> Result<String, ResolveError> {
        resolve(
            &self.ctx.tree,
            &self.ctx.registry,
            &self.ctx.current,
            &self.key,
            Some(subs),
        )
    }

    /// Handles for every child of this node, with full dotted keys.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::KeyNotFound`] when this handle's path
    /// misses and [`ResolveError::NotABranch`] on a leaf.
    pub fn children(&self) -> Result<Vec<StringHandle<'_>>, ResolveError> {
        let keys = child_keys(&self.ctx.tree, &self.key)?;
        Ok(keys
            .into_iter()
            .map(|child| self.ctx.handle(format!("{}.{child}", self.key)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain text", "plain text")]
    #[case("{a} and {b}", "1 and 2")]
    #[case("{{literal}}", "{literal}")]
    #[case("{a}{b}", "12")]
    fn substitution_cases(#[case] input: &str, #[case] expected: &str) {
        let subs = Substitutions::new().with("a", 1).with("b", 2);
        assert_eq!(substitute(input, &subs).expect("substitute"), expected);
    }

    #[rstest]
    fn missing_token_is_an_error() {
        let subs = Substitutions::new().with("a", 1);
        assert_eq!(
            substitute("{a} {missing}", &subs),
            Err(SubstitutionError::MissingToken("missing".to_owned()))
        );
    }

    #[rstest]
    #[case("stuck {token", SubstitutionError::UnterminatedToken)]
    #[case("stray } brace", SubstitutionError::StrayClose)]
    fn malformed_format_strings_fail(
        #[case] input: &str,
        #[case] expected: SubstitutionError,
    ) {
        assert_eq!(substitute(input, &Substitutions::new()), Err(expected));
    }

    #[rstest]
    fn unused_entries_are_ignored() {
        let subs = Substitutions::new().with("unused", "x");
        assert_eq!(substitute("no tokens", &subs).expect("substitute"), "no tokens");
    }
}
