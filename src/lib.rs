//! # taihe-sema
//!
//! Semantic IR construction and validation for the Taihe interface
//! definition language.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! driver      → CompilerInstance: sources in, validated group out
//!   ↓
//! format      → Pretty printer back to IDL text
//! analyses    → Memoized per-declaration analyses for backends
//!   ↓
//! semantics   → Resolution, enum/struct/cycle checks, attribute passes
//!   ↓
//! attributes  → Attribute schemas, registry, standard set
//!   ↓
//! lower       → AST → IR conversion, constant evaluation
//!   ↓
//! ir          → Declaration arena (PackageGroup), checked attributes
//! types       → Resolved types, builtins and generics
//! syntax      → AST handed over by the parser
//!   ↓
//! diagnostics → Diagnostic kinds, severities, DiagnosticsManager
//!   ↓
//! base        → Primitives (DeclId, Span, SourceLocation)
//! ```

// ============================================================================
// MODULES (dependency order: base → diagnostics → syntax/types/ir → lower
//          → attributes → semantics → analyses/format → driver)
// ============================================================================

/// Foundation types: DeclId, Span, SourceLocation
pub mod base;

/// Diagnostics: kinds, severities, the manager
pub mod diagnostics;

/// Syntax: the AST produced by the parser
pub mod syntax;

/// Types: scalars, builtins, generics, user types, callbacks
pub mod types;

/// IR: declaration arena and attribute storage
pub mod ir;

/// Lowering: AST conversion and constant evaluation
pub mod lower;

/// Attribute framework and the standard attribute set
pub mod attributes;

/// Semantic passes over a package group
pub mod semantics;

/// Memoized analyses over the validated IR
pub mod analyses;

/// Pretty printer
pub mod format;

/// Compiler driver
pub mod driver;

// Re-export foundation types
pub use base::{DeclId, Position, SourceLocation, Span};

// Re-export the main entry points
pub use analyses::{Analysis, AnalysisManager, DeclPath};
pub use attributes::{AttributeRegistry, register_standard};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsManager, Severity};
pub use driver::{CompilerInstance, CompilerOptions, SourceFile};
pub use format::{FormatOptions, format_group};
pub use ir::PackageGroup;
pub use semantics::{AnalysisOptions, analyze};
