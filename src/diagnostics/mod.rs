//! Typed, located, severity-tagged compile-time messages.
//!
//! Every pass reports through a [`DiagnosticsManager`]. Recoverable problems
//! are emitted and processing continues; the only diagnostic that travels as
//! an `Err` across scopes is a FATAL one (see [`DiagnosticsManager::for_each`]).

mod diagnostic;
mod kind;
mod manager;

pub use diagnostic::{Diagnostic, Note, Severity};
pub use kind::DiagnosticKind;
pub use manager::DiagnosticsManager;
