//! Compilation driver: sources in, validated package group out.

use std::path::Path;
use std::rc::Rc;

use smol_str::SmolStr;
use tracing::{debug, info, warn};

use crate::analyses::{Analysis, AnalysisManager};
use crate::attributes::{AttributeRegistry, RegistryError, register_standard};
use crate::base::{DeclId, SourceLocation};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsManager};
use crate::format::{FormatOptions, format_group};
use crate::ir::PackageGroup;
use crate::lower::{SourceInfo, convert};
use crate::semantics::{AnalysisOptions, analyze};
use crate::syntax::{Spec, Token};

/// File extension of IDL sources.
pub const SOURCE_EXTENSION: &str = "taihe";

/// Compiler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Run attribute conversion and checks even if resolution failed.
    pub attributes_on_error: bool,
    /// Register the standard attribute set on construction.
    pub register_standard_attributes: bool,
    /// Annotate type references with their resolved signature when
    /// formatting.
    pub print_resolved_types: bool,
    /// Upper bound on suggestions for an unknown attribute name.
    pub max_suggestions: usize,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            attributes_on_error: true,
            register_standard_attributes: true,
            print_resolved_types: false,
            max_suggestions: 3,
        }
    }
}

/// One parsed input file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: SmolStr,
    pub pkg_name: SmolStr,
    pub is_stdlib: bool,
    pub spec: Spec,
    /// Tokens the parser could not make sense of.
    pub syntax_errors: Vec<Token>,
}

impl SourceFile {
    /// A source whose package name is the file name without extension,
    /// e.g. `idl/ohos.net.http.taihe` declares `ohos.net.http`.
    pub fn new(path: impl Into<SmolStr>, spec: Spec) -> Self {
        let path = path.into();
        let pkg_name = Path::new(path.as_str())
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .into();
        Self {
            path,
            pkg_name,
            is_stdlib: false,
            spec,
            syntax_errors: Vec::new(),
        }
    }

    pub fn with_package_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.pkg_name = name.into();
        self
    }

    pub fn stdlib(mut self) -> Self {
        self.is_stdlib = true;
        self
    }

    pub fn with_syntax_error(mut self, token: Token) -> Self {
        self.syntax_errors.push(token);
        self
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            file: self.path.clone(),
            pkg_name: self.pkg_name.clone(),
            is_stdlib: self.is_stdlib,
        }
    }
}

/// Owns everything one compilation needs.
#[derive(Debug)]
pub struct CompilerInstance {
    options: CompilerOptions,
    registry: AttributeRegistry,
    dm: DiagnosticsManager,
    pg: PackageGroup,
    am: AnalysisManager,
    sources: Vec<SourceFile>,
    /// Number of leading `sources` already converted.
    parsed: usize,
    validated: bool,
}

impl CompilerInstance {
    pub fn new(options: CompilerOptions) -> Result<Self, RegistryError> {
        let mut registry = AttributeRegistry::new().with_max_suggestions(options.max_suggestions);
        if options.register_standard_attributes {
            register_standard(&mut registry)?;
        }
        Ok(Self {
            options,
            registry,
            dm: DiagnosticsManager::new(),
            pg: PackageGroup::new(),
            am: AnalysisManager::new(),
            sources: Vec::new(),
            parsed: 0,
            validated: false,
        })
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    /// For registering project-specific attributes before `validate`.
    pub fn registry_mut(&mut self) -> &mut AttributeRegistry {
        &mut self.registry
    }

    pub fn diagnostics(&self) -> &DiagnosticsManager {
        &self.dm
    }

    pub fn package_group(&self) -> &PackageGroup {
        &self.pg
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    /// Queue a source. Files without the `.taihe` extension are ignored
    /// with a warning.
    pub fn add_source(&mut self, source: SourceFile) -> bool {
        let extension = Path::new(source.path.as_str())
            .extension()
            .and_then(|ext| ext.to_str());
        if extension != Some(SOURCE_EXTENSION) {
            warn!(path = %source.path, "ignoring source");
            self.dm.emit(Diagnostic::new(
                DiagnosticKind::IgnoredFile {
                    reason: "unexpected file extension, should be .taihe",
                },
                Some(SourceLocation::file(source.path.clone())),
            ));
            return false;
        }
        self.sources.push(source);
        true
    }

    /// Convert the sources queued since the last call into the package
    /// group. A source that fails fatally is reported and skipped; the
    /// others still convert.
    pub fn parse(&mut self) -> bool {
        let Self {
            sources,
            parsed,
            pg,
            dm,
            ..
        } = self;
        let pending = &sources[*parsed..];
        *parsed = sources.len();
        let all_ok = dm.for_each(pending.iter(), |dm, source| {
            for token in &source.syntax_errors {
                dm.emit(Diagnostic::new(
                    DiagnosticKind::IdlSyntax {
                        token: token.text.clone(),
                    },
                    Some(SourceLocation {
                        file: source.path.clone(),
                        span: token.span,
                    }),
                ));
            }
            convert(&source.spec, &source.info(), pg, dm).map(|_| ())
        });
        info!(
            sources = self.sources.len(),
            packages = self.pg.packages().count(),
            errors = self.dm.error_count(),
            "parsed sources"
        );
        all_ok
    }

    /// Run the semantic passes. The group is validated once; later calls
    /// are no-ops.
    pub fn validate(&mut self) {
        if self.validated {
            debug!("package group already validated");
            return;
        }
        self.validated = true;
        let options = AnalysisOptions {
            attributes_on_error: self.options.attributes_on_error,
        };
        analyze(&mut self.pg, &self.registry, &options, &mut self.dm);
    }

    /// Parse and validate. Returns whether code generation may proceed,
    /// i.e. nothing at ERROR or above was reported.
    pub fn run(&mut self) -> bool {
        self.parse();
        self.validate();
        let ok = !self.dm.has_error();
        info!(
            ok,
            errors = self.dm.error_count(),
            warnings = self.dm.warning_count(),
            "compilation finished"
        );
        ok
    }

    /// Memoized analysis of `decl`.
    pub fn analysis<A: Analysis>(&self, decl: DeclId) -> Rc<A> {
        self.am.get::<A>(&self.pg, decl)
    }

    /// The package group as IDL text.
    pub fn format(&self) -> String {
        let options = FormatOptions::default().with_resolved(self.options.print_resolved_types);
        format_group(&self.pg, options)
    }
}
