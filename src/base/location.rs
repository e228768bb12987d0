//! Source locations attached to declarations and diagnostics.

use std::fmt;

use smol_str::SmolStr;

use super::position::Span;

/// Where something came from: a source file plus an optional span.
///
/// A location without a span refers to the whole file (for example the
/// package declaration implied by a file name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SourceLocation {
    pub file: SmolStr,
    pub span: Option<Span>,
}

impl SourceLocation {
    /// A location covering a whole file.
    pub fn file(file: impl Into<SmolStr>) -> Self {
        Self {
            file: file.into(),
            span: None,
        }
    }

    /// A location pointing at a span inside a file.
    pub fn new(file: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            file: file.into(),
            span: Some(span),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{}:{}:{}", self.file, span.start.line, span.start.column),
            None => write!(f, "{}", self.file),
        }
    }
}

/// Placeholder rendered when a diagnostic has no location at all.
pub const UNKNOWN_LOCATION: &str = "<unknown>";

/// Render an optional location the way diagnostics print it.
pub fn display_location(loc: Option<&SourceLocation>) -> String {
    loc.map(ToString::to_string)
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}
