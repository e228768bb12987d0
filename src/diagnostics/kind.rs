//! The closed set of diagnostics the semantic layer can report.

use smol_str::SmolStr;
use thiserror::Error;

use super::Severity;

/// What went wrong, independent of where.
///
/// The `Display` text of each variant is the message shown after the
/// `location: severity:` prefix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosticKind {
    // ========================================================================
    // ATTRIBUTES
    // ========================================================================
    #[error("Positioned arguments cannot follow keyword arguments in attribute calls.")]
    AttrArgOrder,

    #[error("redefinition of key '{key}'")]
    AttrArgRedef { key: SmolStr },

    #[error("Missing {} argument '{arg}' in attribute '{attr}'.", argument_kind(.kw_only))]
    AttrArgMissing {
        attr: SmolStr,
        arg: SmolStr,
        kw_only: bool,
    },

    #[error("Unexpected {} in attribute '{attr}'.", unexpected_argument(.key))]
    AttrArgUnrequired { attr: SmolStr, key: Option<SmolStr> },

    #[error("Argument '{arg}' in attribute {attr} must be of type {expected}, but got {got}")]
    AttrArgType {
        attr: SmolStr,
        arg: SmolStr,
        expected: String,
        got: String,
    },

    #[error("Unknown attribute: '{name}'{}", candidates(.suggestions))]
    AttrNotExist {
        name: SmolStr,
        suggestions: Vec<SmolStr>,
    },

    #[error("cannot attach {attr} due to conflict")]
    AttrConflict { attr: String },

    #[error("{attr} cannot be attached to {decl}")]
    AttrTarget { attr: String, decl: String },

    // ========================================================================
    // DECLARATIONS AND RESOLUTION
    // ========================================================================
    #[error("redefinition of {decl}")]
    DeclRedef { decl: String },

    #[error("package '{name}' not exist")]
    PackageNotExist { name: SmolStr },

    #[error("declaration '{name}' not exist")]
    DeclNotExist { name: SmolStr },

    #[error("'{name}' is not a type name")]
    NotAType { name: SmolStr },

    #[error("declaration name '{name}' is not declared or imported in this scope")]
    DeclarationNotInScope { name: SmolStr },

    #[error("package name '{name}' is not imported in this scope")]
    PackageNotInScope { name: SmolStr },

    #[error("Invalid generic arguments in '{ty_ref}', expected {expected}, got {got}")]
    GenericArguments {
        ty_ref: String,
        expected: usize,
        got: usize,
    },

    #[error("declaration of {decl} conflicts with namespace '{name}'")]
    SymbolConflictWithNamespace { decl: String, name: SmolStr },

    #[error("{ty} cannot be used in this context")]
    TypeUsage { ty: String },

    // ========================================================================
    // DECLARATION SHAPE
    // ========================================================================
    #[error("value of {item} ({value}) is conflict with {enum_decl} ({ty})")]
    EnumValue {
        item: String,
        value: String,
        enum_decl: String,
        ty: String,
    },

    #[error("{decl} cannot be empty, at least one field is required")]
    EmptyStructOrUnion { decl: String },

    #[error("{parent} is extended multiple times by {iface}")]
    DuplicateExtends { parent: String, iface: String },

    #[error("cycle detected in {decl}")]
    RecursiveReference { decl: String },

    // ========================================================================
    // SOURCES
    // ========================================================================
    #[error("unexpected '{token}'")]
    IdlSyntax { token: SmolStr },

    #[error("unrecognized file: {reason}")]
    IgnoredFile { reason: &'static str },

    #[error("invalid package name '{name}'")]
    InvalidPackageName { name: SmolStr },

    #[error("{message}")]
    ConstEval { message: String },

    #[error("{message}")]
    Adhoc { severity: Severity, message: String },
}

impl DiagnosticKind {
    /// The fixed severity of this kind.
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::DuplicateExtends { .. } | DiagnosticKind::IgnoredFile { .. } => {
                Severity::Warn
            }
            DiagnosticKind::InvalidPackageName { .. } => Severity::Fatal,
            DiagnosticKind::Adhoc { severity, .. } => *severity,
            _ => Severity::Error,
        }
    }

    /// Short stable identifier, used in logs and JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::AttrArgOrder => "attr-arg-order",
            DiagnosticKind::AttrArgRedef { .. } => "attr-arg-redef",
            DiagnosticKind::AttrArgMissing { .. } => "attr-arg-missing",
            DiagnosticKind::AttrArgUnrequired { .. } => "attr-arg-unrequired",
            DiagnosticKind::AttrArgType { .. } => "attr-arg-type",
            DiagnosticKind::AttrNotExist { .. } => "attr-not-exist",
            DiagnosticKind::AttrConflict { .. } => "attr-conflict",
            DiagnosticKind::AttrTarget { .. } => "attr-target",
            DiagnosticKind::DeclRedef { .. } => "decl-redef",
            DiagnosticKind::PackageNotExist { .. } => "package-not-exist",
            DiagnosticKind::DeclNotExist { .. } => "decl-not-exist",
            DiagnosticKind::NotAType { .. } => "not-a-type",
            DiagnosticKind::DeclarationNotInScope { .. } => "decl-not-in-scope",
            DiagnosticKind::PackageNotInScope { .. } => "package-not-in-scope",
            DiagnosticKind::GenericArguments { .. } => "generic-arguments",
            DiagnosticKind::SymbolConflictWithNamespace { .. } => "symbol-conflict-with-namespace",
            DiagnosticKind::TypeUsage { .. } => "type-usage",
            DiagnosticKind::EnumValue { .. } => "enum-value",
            DiagnosticKind::EmptyStructOrUnion { .. } => "empty-struct-or-union",
            DiagnosticKind::DuplicateExtends { .. } => "duplicate-extends",
            DiagnosticKind::RecursiveReference { .. } => "recursive-reference",
            DiagnosticKind::IdlSyntax { .. } => "idl-syntax",
            DiagnosticKind::IgnoredFile { .. } => "ignored-file",
            DiagnosticKind::InvalidPackageName { .. } => "invalid-package-name",
            DiagnosticKind::ConstEval { .. } => "const-eval",
            DiagnosticKind::Adhoc { .. } => "adhoc",
        }
    }
}

fn argument_kind(kw_only: &bool) -> &'static str {
    if *kw_only {
        "keyword-only"
    } else {
        "positional or keyword"
    }
}

fn unexpected_argument(key: &Option<SmolStr>) -> String {
    match key {
        Some(key) => format!("keyword argument '{key}'"),
        None => "positional argument".to_string(),
    }
}

fn candidates(suggestions: &[SmolStr]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{s}'")).collect();
    format!(", possible candidates: {}", quoted.join(", "))
}
