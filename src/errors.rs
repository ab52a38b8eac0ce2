//! Error types with rich diagnostics using miette
//!
//! Every error belongs to exactly one icon. None of them abort a group.

use std::fmt;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Extract Errors
// ============================================================================

/// Errors found while locating a definition in bundle text
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{name}: no `{constructor}({{` literal after the definition marker")]
    #[diagnostic(code(icon_extract::extract::marker_not_found))]
    MarkerNotFound {
        name: String,
        constructor: String,
        offset: usize,
    },

    #[error("{name}: literal opened at offset {offset} is never closed")]
    #[diagnostic(
        code(icon_extract::extract::unbalanced_literal),
        help("a closing brace is missing somewhere inside this definition")
    )]
    UnbalancedLiteral { name: String, offset: usize },
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Errors that occur while reading one icon literal
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{name}: unexpected token at offset {offset}, expected {expected}")]
    #[diagnostic(code(icon_extract::parse::unexpected_token))]
    UnexpectedToken {
        name: String,
        offset: usize,
        expected: String,
    },

    #[error("{name}: unterminated string starting at offset {offset}")]
    #[diagnostic(code(icon_extract::parse::unterminated_string))]
    UnterminatedString { name: String, offset: usize },

    #[error("{name}: missing required key `{key}`")]
    #[diagnostic(
        code(icon_extract::parse::missing_required_key),
        help("icon literals need both `attr` and `child` keys at the top level")
    )]
    MissingRequiredKey {
        name: String,
        key: &'static str,
        offset: usize,
    },
}

impl ParseError {
    pub fn name(&self) -> &str {
        match self {
            ParseError::UnexpectedToken { name, .. }
            | ParseError::UnterminatedString { name, .. }
            | ParseError::MissingRequiredKey { name, .. } => name,
        }
    }

    /// Byte offset of the problem. Straight out of [`parse`](crate::parse::parse)
    /// this points into the literal; after [`rebased`](Self::rebased) it points
    /// into the surrounding text.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::UnterminatedString { offset, .. }
            | ParseError::MissingRequiredKey { offset, .. } => *offset,
        }
    }

    /// Shift the offset by `base`, the position of the literal in the bundle.
    pub fn rebased(mut self, base: usize) -> Self {
        match &mut self {
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::UnterminatedString { offset, .. }
            | ParseError::MissingRequiredKey { offset, .. } => *offset += base,
        }
        self
    }

    /// Attach the text the offset points into so the report can show the
    /// offending byte.
    pub fn with_source(self, text: &str) -> miette::Report {
        IconError::Parse(self).with_source(text)
    }
}

/// An [`IconError`] together with the text it refers to
#[derive(Error, Diagnostic, Debug)]
#[error("{inner}")]
#[diagnostic(code(icon_extract::located))]
struct LocatedError {
    #[source_code]
    src: NamedSource<String>,
    #[label("{kind}")]
    span: SourceSpan,
    kind: ErrorKind,
    inner: IconError,
}

// ============================================================================
// Per-icon failures
// ============================================================================

/// Flat classification used in failure records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MarkerNotFound,
    UnbalancedLiteral,
    UnexpectedToken,
    UnterminatedString,
    MissingRequiredKey,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::MarkerNotFound => "marker not found",
            ErrorKind::UnbalancedLiteral => "unbalanced literal",
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::UnterminatedString => "unterminated string",
            ErrorKind::MissingRequiredKey => "missing required key",
        };
        f.write_str(s)
    }
}

/// Anything that can go wrong for a single icon
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum IconError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

impl IconError {
    pub fn name(&self) -> &str {
        match self {
            IconError::Extract(ExtractError::MarkerNotFound { name, .. })
            | IconError::Extract(ExtractError::UnbalancedLiteral { name, .. }) => name,
            IconError::Parse(e) => e.name(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            IconError::Extract(ExtractError::MarkerNotFound { .. }) => ErrorKind::MarkerNotFound,
            IconError::Extract(ExtractError::UnbalancedLiteral { .. }) => {
                ErrorKind::UnbalancedLiteral
            }
            IconError::Parse(ParseError::UnexpectedToken { .. }) => ErrorKind::UnexpectedToken,
            IconError::Parse(ParseError::UnterminatedString { .. }) => {
                ErrorKind::UnterminatedString
            }
            IconError::Parse(ParseError::MissingRequiredKey { .. }) => {
                ErrorKind::MissingRequiredKey
            }
        }
    }

    /// Offset of the problem. Errors coming out of
    /// [`read_group`](crate::batch::read_group) all point into the bundle.
    pub fn offset(&self) -> usize {
        match self {
            IconError::Extract(ExtractError::MarkerNotFound { offset, .. })
            | IconError::Extract(ExtractError::UnbalancedLiteral { offset, .. }) => *offset,
            IconError::Parse(e) => e.offset(),
        }
    }

    /// Attach the text the offset points into, named after the icon.
    pub fn with_source(self, text: &str) -> miette::Report {
        let offset = self.offset().min(text.len());
        let located = LocatedError {
            src: NamedSource::new(self.name().to_string(), text.to_string()),
            span: SourceSpan::from((offset, 0)),
            kind: self.kind(),
            inner: self,
        };
        miette::Report::new(located)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        let err: IconError = ParseError::MissingRequiredKey {
            name: "FaHome".into(),
            key: "attr",
            offset: 0,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredKey);
        assert_eq!(err.name(), "FaHome");

        let err: IconError = ExtractError::UnbalancedLiteral {
            name: "FaBroken".into(),
            offset: 42,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::UnbalancedLiteral);
        assert_eq!(err.offset(), 42);
    }

    #[test]
    fn messages_name_the_icon() {
        let err = ParseError::UnexpectedToken {
            name: "FaHome".into(),
            offset: 7,
            expected: "`:`".into(),
        };
        assert_eq!(
            err.to_string(),
            "FaHome: unexpected token at offset 7, expected `:`"
        );
        assert_eq!(ErrorKind::UnbalancedLiteral.to_string(), "unbalanced literal");
    }

    #[test]
    fn with_source_keeps_message() {
        let err = ParseError::UnterminatedString {
            name: "FaHome".into(),
            offset: 3,
        };
        let report = err.with_source("{a:\"oops}");
        assert!(report.to_string().contains("unterminated string"));
    }

    #[test]
    fn rebase_shifts_offset() {
        let err = ParseError::MissingRequiredKey {
            name: "FaHome".into(),
            key: "child",
            offset: 4,
        }
        .rebased(100);
        assert_eq!(err.offset(), 104);
        assert_eq!(err.name(), "FaHome");
    }

    #[test]
    fn located_report_labels_the_byte() {
        let bundle = "module.exports.FaHome = function FaHome (props) {\n";
        let err: IconError = ExtractError::MarkerNotFound {
            name: "FaHome".into(),
            constructor: "GenIcon".into(),
            offset: 0,
        }
        .into();
        let report = err.with_source(bundle);
        let rendered = format!("{report:?}");
        assert!(rendered.contains("marker not found"), "{rendered}");
        assert!(rendered.contains("module.exports.FaHome"), "{rendered}");
    }
}
