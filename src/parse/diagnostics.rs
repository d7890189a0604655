//! Translates JSON parsing errors into actionable diagnostics.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::hints::JSON_HINTS;

/// JSON source content for a strings file.
///
/// # Examples
/// ```rust
/// use kotoba::parse::SourceText;
/// let source = SourceText::from("[]");
/// assert_eq!(source.as_str(), "[]");
/// ```
#[derive(Debug, Clone)]
pub struct SourceText(String);

impl SourceText {
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for SourceText {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SourceText {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for SourceText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Display name for a strings source used in diagnostics.
///
/// # Examples
/// ```rust
/// use kotoba::parse::SourceName;
/// let name = SourceName::new("strings.json");
/// assert_eq!(name.as_str(), "strings.json");
/// ```
#[derive(Debug, Clone)]
pub struct SourceName(String);

impl SourceName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for SourceName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SourceName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for SourceName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for SourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convert a 1-based line/column pair into a byte index into the source.
fn location_to_index(src: &SourceText, line: usize, column: usize) -> usize {
    let target_line = line.saturating_sub(1);
    let target_column = column.saturating_sub(1);
    let mut offset = 0usize;
    for (idx, segment) in src.as_ref().split_inclusive('\n').enumerate() {
        if idx == target_line {
            let text = segment.strip_suffix('\n').unwrap_or(segment);
            let byte_index = text
                .char_indices()
                .nth(target_column)
                .map_or(text.len(), |(byte_idx, _)| byte_idx);
            return offset + byte_index;
        }
        offset += segment.len();
    }
    src.as_ref().len()
}

fn to_span(src: &SourceText, line: usize, column: usize) -> SourceSpan {
    let at = location_to_index(src, line, column);
    let bytes = src.as_ref().as_bytes();
    let (start, end) = match bytes.get(at) {
        Some(&b) if b != b'\n' => (at, at + 1),
        _ => {
            let start = if at > 0 && bytes.get(at - 1).is_some_and(|p| *p != b'\n') {
                at - 1
            } else {
                at
            };
            (start, at)
        }
    };
    let len = end.saturating_sub(start);
    SourceSpan::new(start.into(), len)
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(kotoba::json::parse))]
struct JsonDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("parse error here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    #[source]
    source: serde_json::Error,
    message: String,
}

fn hint_for(err_str: &str) -> Option<String> {
    let lower = err_str.to_lowercase();
    JSON_HINTS
        .iter()
        .find(|(needle, _)| lower.contains(*needle))
        .map(|(_, hint)| (*hint).into())
}

/// Wrap a `serde_json` error in a diagnostic carrying the source text,
/// a span pointing at the failure, and a hint when one applies.
#[must_use]
pub fn map_json_error(
    err: serde_json::Error,
    src: &SourceText,
    name: &SourceName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let (line, column) = (err.line(), err.column());
    let span = (line > 0).then(|| to_span(src, line, column));
    let err_str = err.to_string();
    let hint = hint_for(&err_str);
    let mut message = format!("JSON parse error at line {line}, column {column}: {err_str}");
    if let Some(ref h) = hint {
        message.push_str("\nhelp: ");
        message.push_str(h);
    }

    Box::new(JsonDiagnostic {
        src: NamedSource::new(name.as_ref(), src.as_ref().to_owned()),
        span,
        help: hint,
        source: err,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_json_error_includes_trailing_comma_hint() {
        let src = SourceText::from("[{\"key\": \"a\",}]");
        let err = serde_json::from_str::<serde_json::Value>(src.as_ref())
            .expect_err("expected parse error");
        let name = SourceName::from("test");
        let diag = map_json_error(err, &src, &name);
        let msg = diag.to_string();
        assert!(msg.contains("line 1"), "message: {msg}");
    }

    #[test]
    fn span_points_into_the_failing_line() {
        let src = SourceText::from("[\n  {\"key\" \"a\"}\n]");
        let err = serde_json::from_str::<serde_json::Value>(src.as_ref())
            .expect_err("expected parse error");
        let name = SourceName::from("test");
        let diag = map_json_error(err, &src, &name);
        assert!(diag.to_string().contains("line 2"));
    }
}
