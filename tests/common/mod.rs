//! Shared fixtures for integration tests.

use kotoba::lang::LanguageRegistry;
use kotoba::parse;
use kotoba::tree::ResourceTree;

/// A small but representative strings file: nested branches, a branch
/// with its own text, substitution tokens, `_long` arrays, and literal
/// `\n` escapes.
#[must_use]
pub fn sample_source() -> &'static str {
    r#"[
  {
    "key": "ui",
    "strings": [
      { "key": "greeting", "ja": "こんにちは、{name}さん!", "en": "Hello, {name}!" },
      { "key": "farewell", "ja": "さようなら", "en": "Goodbye" },
      {
        "key": "about",
        "ja": "バージョン",
        "en": "Version",
        "strings": [
          { "key": "body", "ja_long": ["一行目", "二行目"], "en_long": ["line one", "line two"] }
        ]
      }
    ]
  },
  { "key": "motd", "ja": "今日は\\nいい天気", "en": "line1\\nline2" }
]"#
}

#[must_use]
pub fn sample_tree() -> ResourceTree {
    parse::parse_str(sample_source(), &LanguageRegistry::default()).expect("sample parses")
}
