//! Accumulates diagnostics for one compilation.

use tracing::debug;

use super::diagnostic::{Diagnostic, Severity};

/// Collects every diagnostic emitted by the passes and tracks the running
/// maximum severity.
///
/// Passes only ever append; the order of `diagnostics()` is the order of
/// emission, which is deterministic for a given input.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticsManager {
    diagnostics: Vec<Diagnostic>,
    max_level: Severity,
}

impl DiagnosticsManager {
    /// Create a new empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        let severity = diagnostic.severity();
        debug!(
            code = diagnostic.kind.code(),
            %severity,
            "{}",
            diagnostic.kind
        );
        self.max_level = self.max_level.max(severity);
        self.diagnostics.push(diagnostic);
    }

    /// Emit the error of a failed result and turn it into `None`.
    pub fn recover<T>(&mut self, result: Result<T, Diagnostic>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(diagnostic) => {
                self.emit(diagnostic);
                None
            }
        }
    }

    /// Apply `f` to every item, emitting (and otherwise ignoring) the
    /// diagnostic of each failing item so the rest still get processed.
    ///
    /// Returns `true` if every item succeeded.
    pub fn for_each<T, I, F>(&mut self, items: I, mut f: F) -> bool
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&mut Self, T) -> Result<(), Diagnostic>,
    {
        let mut all_ok = true;
        for item in items {
            if let Err(diagnostic) = f(self, item) {
                self.emit(diagnostic);
                all_ok = false;
            }
        }
        all_ok
    }

    /// The most severe level seen so far (NOTE when nothing was emitted).
    pub fn current_level(&self) -> Severity {
        self.max_level
    }

    /// Whether anything at ERROR or above was emitted.
    pub fn has_error(&self) -> bool {
        self.max_level >= Severity::Error
    }

    /// Whether a FATAL diagnostic was emitted.
    pub fn has_fatal(&self) -> bool {
        self.max_level >= Severity::Fatal
    }

    /// Get all diagnostics in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors (including fatal ones).
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warn)
            .count()
    }

    /// Render every diagnostic, one block per diagnostic.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
        out
    }

    /// Take all diagnostics, leaving the manager empty and resetting the level.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.max_level = Severity::Note;
        std::mem::take(&mut self.diagnostics)
    }

    /// Serialize all diagnostics as a JSON array.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        let records: Vec<DiagnosticRecord<'_>> =
            self.diagnostics.iter().map(DiagnosticRecord::from).collect();
        serde_json::to_string_pretty(&records)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct DiagnosticRecord<'a> {
    code: &'static str,
    severity: Severity,
    location: Option<&'a crate::base::SourceLocation>,
    message: String,
    notes: Vec<NoteRecord<'a>>,
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct NoteRecord<'a> {
    location: Option<&'a crate::base::SourceLocation>,
    message: &'a str,
}

#[cfg(feature = "serde")]
impl<'a> From<&'a Diagnostic> for DiagnosticRecord<'a> {
    fn from(diagnostic: &'a Diagnostic) -> Self {
        Self {
            code: diagnostic.kind.code(),
            severity: diagnostic.severity(),
            location: diagnostic.loc.as_ref(),
            message: diagnostic.message(),
            notes: diagnostic
                .notes
                .iter()
                .map(|note| NoteRecord {
                    location: note.loc.as_ref(),
                    message: &note.message,
                })
                .collect(),
        }
    }
}
