//! Located diagnostic records.

use std::fmt;

use crate::base::{SourceLocation, display_location};

use super::kind::DiagnosticKind;

/// Severity level of a diagnostic, ordered from least to most severe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Context only.
    #[default]
    Note,
    /// Advisory; never blocks code generation.
    Warn,
    /// Blocks code generation, analysis continues.
    Error,
    /// Discards the affected source entirely.
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warn => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A NOTE-level line attached to a diagnostic.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub loc: Option<SourceLocation>,
    pub message: String,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            display_location(self.loc.as_ref()),
            Severity::Note,
            self.message
        )
    }
}

/// A diagnostic message with location and trailing notes.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub loc: Option<SourceLocation>,
    pub notes: Vec<Note>,
}

impl Diagnostic {
    /// Create a diagnostic of the given kind at a location.
    pub fn new(kind: DiagnosticKind, loc: Option<SourceLocation>) -> Self {
        Self {
            kind,
            loc,
            notes: Vec::new(),
        }
    }

    /// An ad-hoc error with a free-form message.
    pub fn error(message: impl Into<String>, loc: Option<SourceLocation>) -> Self {
        Self::adhoc(Severity::Error, message, loc)
    }

    /// An ad-hoc warning with a free-form message.
    pub fn warning(message: impl Into<String>, loc: Option<SourceLocation>) -> Self {
        Self::adhoc(Severity::Warn, message, loc)
    }

    /// An ad-hoc diagnostic of any severity.
    pub fn adhoc(
        severity: Severity,
        message: impl Into<String>,
        loc: Option<SourceLocation>,
    ) -> Self {
        Self::new(
            DiagnosticKind::Adhoc {
                severity,
                message: message.into(),
            },
            loc,
        )
    }

    /// Add a note line.
    pub fn with_note(mut self, loc: Option<SourceLocation>, message: impl Into<String>) -> Self {
        self.notes.push(Note {
            loc,
            message: message.into(),
        });
        self
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// The message without location or severity prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn is_error(&self) -> bool {
        self.severity() >= Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            display_location(self.loc.as_ref()),
            self.severity(),
            self.kind
        )?;
        for note in &self.notes {
            write!(f, "\n{note}")?;
        }
        Ok(())
    }
}
