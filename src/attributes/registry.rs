//! The attribute registry: name lookup, conversion and context checks.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::{debug, trace};

use crate::base::DeclId;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsManager};
use crate::ir::{AttrId, CheckedAttribute, PackageGroup, UncheckedAttribute};

use super::construct::construct;
use super::schema::AttrSchema;
use super::suggest::close_matches;

/// Minimum similarity for an unknown-name suggestion.
const SUGGESTION_CUTOFF: f64 = 0.6;

/// Programmer errors raised while setting up a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("attribute '{0}' is already registered")]
    DuplicateAttribute(SmolStr),

    #[error("attribute '{attr}' declares field '{field}' more than once")]
    DuplicateField { attr: SmolStr, field: SmolStr },
}

/// Every attribute schema known to a compilation.
///
/// Built once by the driver and then only read.
#[derive(Debug, Clone)]
pub struct AttributeRegistry {
    schemas: Vec<AttrSchema>,
    by_name: FxHashMap<SmolStr, AttrId>,
    max_suggestions: usize,
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self {
            schemas: Vec::new(),
            by_name: FxHashMap::default(),
            max_suggestions: 3,
        }
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    pub fn register(&mut self, schema: AttrSchema) -> Result<AttrId, RegistryError> {
        if self.by_name.contains_key(&schema.name) {
            return Err(RegistryError::DuplicateAttribute(schema.name));
        }
        for (i, field) in schema.fields.iter().enumerate() {
            if schema.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(RegistryError::DuplicateField {
                    attr: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        let id = AttrId::new(self.schemas.len());
        trace!(attr = %schema.name, "registered attribute");
        self.by_name.insert(schema.name.clone(), id);
        self.schemas.push(schema);
        Ok(id)
    }

    pub fn register_all(
        &mut self,
        schemas: impl IntoIterator<Item = AttrSchema>,
    ) -> Result<(), RegistryError> {
        for schema in schemas {
            self.register(schema)?;
        }
        Ok(())
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    pub fn lookup(&self, name: &str) -> Option<AttrId> {
        self.by_name.get(name).copied()
    }

    pub fn schema(&self, id: AttrId) -> &AttrSchema {
        &self.schemas[id.index()]
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered names resembling `name`, best first.
    pub fn suggestions(&self, name: &str) -> Vec<SmolStr> {
        let mut names: Vec<&str> = self.schemas.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        close_matches(name, names, self.max_suggestions, SUGGESTION_CUTOFF)
            .into_iter()
            .map(SmolStr::new)
            .collect()
    }

    /// The single instance of the named attribute on `decl`.
    pub fn get_single<'a>(
        &self,
        pg: &'a PackageGroup,
        decl: DeclId,
        name: &str,
    ) -> Option<&'a CheckedAttribute> {
        pg.node(decl).attrs.get_single(self.lookup(name)?)
    }

    /// Every instance of the named attribute on `decl`.
    pub fn get_all<'a>(
        &self,
        pg: &'a PackageGroup,
        decl: DeclId,
        name: &str,
    ) -> &'a [CheckedAttribute] {
        match self.lookup(name) {
            Some(id) => pg.node(decl).attrs.get_all(id),
            None => &[],
        }
    }

    // ========================================================================
    // CONVERSION
    // ========================================================================

    /// Validate one parsed attribute.
    pub fn construct(&self, raw: &UncheckedAttribute) -> Result<CheckedAttribute, Diagnostic> {
        let Some(id) = self.lookup(&raw.name) else {
            return Err(Diagnostic::new(
                DiagnosticKind::AttrNotExist {
                    name: raw.name.clone(),
                    suggestions: self.suggestions(&raw.name),
                },
                raw.loc.clone(),
            ));
        };
        construct(id, self.schema(id), raw)
    }

    /// Drain the unchecked attributes of `decl` and attach the ones that
    /// validate.
    pub fn convert(&self, pg: &mut PackageGroup, decl: DeclId, dm: &mut DiagnosticsManager) {
        let unchecked = pg.node_mut(decl).attrs.take_unchecked();
        if unchecked.is_empty() {
            return;
        }
        for raw in &unchecked {
            if let Some(attr) = dm.recover(self.construct(raw)) {
                pg.node_mut(decl).attrs.attach(attr);
            }
        }
    }

    // ========================================================================
    // CONTEXT CHECKS
    // ========================================================================

    /// Check every attached attribute of `decl` against its target, the
    /// other attributes and its own extra check.
    pub fn check_context(&self, pg: &PackageGroup, decl: DeclId, dm: &mut DiagnosticsManager) {
        let attrs = &pg.node(decl).attrs;
        for attr in attrs.iter_checked() {
            let schema = self.schema(attr.id);
            let tag = pg.tag(decl);
            if !schema.accepts_target(tag) {
                dm.emit(Diagnostic::new(
                    DiagnosticKind::AttrTarget {
                        attr: attr.description(),
                        decl: pg.description(decl),
                    },
                    pg.node(decl).loc.clone(),
                ));
                continue;
            }

            if !schema.repeatable {
                if let Some(first) = attrs.get_single(attr.id) {
                    if !std::ptr::eq(first, attr) {
                        dm.emit(conflict(first, attr));
                    }
                }
            }

            for other in attrs.iter_checked() {
                if other.id == attr.id {
                    continue;
                }
                if schema.shares_group(self.schema(other.id)) {
                    dm.emit(conflict(other, attr));
                }
            }

            if let Some(check) = schema.check {
                check(pg, decl, attr, dm);
            }
        }
        debug!(decl = %pg.description(decl), "checked attribute context");
    }
}

fn conflict(prev: &CheckedAttribute, current: &CheckedAttribute) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::AttrConflict {
            attr: current.description(),
        },
        current.loc.clone(),
    )
    .with_note(
        prev.loc.clone(),
        format!("conflicting with {}", prev.description()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::schema::{AttrGroup, FieldSpec, ValueType};
    use crate::base::{SourceLocation, Span};
    use crate::ir::{DeclKind, DeclNode, DeclTag, PackageDecl};

    const KIND: AttrGroup = AttrGroup("kind");

    fn registry() -> AttributeRegistry {
        let mut registry = AttributeRegistry::new();
        registry
            .register_all([
                AttrSchema::new("class").on(DeclTag::Package),
                AttrSchema::new("inject")
                    .on(DeclTag::Package)
                    .field(FieldSpec::required("code", ValueType::Str))
                    .repeatable(),
                AttrSchema::new("get").on(DeclTag::Package).group(KIND),
                AttrSchema::new("set").on(DeclTag::Package).group(KIND),
                AttrSchema::new("only_params").on(DeclTag::Param),
                AttrSchema::new("strict").on(DeclTag::Package).check(reject),
            ])
            .unwrap();
        registry
    }

    fn reject(_: &PackageGroup, _: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
        dm.emit(Diagnostic::error("rejected by strict", attr.loc.clone()));
    }

    fn package(pg: &mut PackageGroup) -> DeclId {
        pg.alloc(DeclNode::new(
            DeclKind::Package(PackageDecl::new("p", false)),
            Some(SourceLocation::file("p.taihe")),
        ))
    }

    fn raw(name: &str, col: usize) -> UncheckedAttribute {
        UncheckedAttribute {
            name: name.into(),
            args: Vec::new(),
            loc: Some(SourceLocation::new("p.taihe", Span::point(1, col))),
        }
    }

    fn run(names: &[&str]) -> DiagnosticsManager {
        let registry = registry();
        let mut pg = PackageGroup::new();
        let pkg = package(&mut pg);
        for (i, name) in names.iter().enumerate() {
            pg.node_mut(pkg).attrs.push_unchecked(raw(name, i + 1));
        }
        let mut dm = DiagnosticsManager::new();
        registry.convert(&mut pg, pkg, &mut dm);
        registry.check_context(&pg, pkg, &mut dm);
        dm
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = registry();
        let err = registry.register(AttrSchema::new("class")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateAttribute("class".into()));
        let err = registry
            .register(
                AttrSchema::new("twice")
                    .field(FieldSpec::required("a", ValueType::Int))
                    .field(FieldSpec::required("a", ValueType::Int)),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateField { .. }));
    }

    #[test]
    fn test_unknown_attribute_suggests() {
        let dm = run(&["clas"]);
        assert_eq!(
            dm.diagnostics()[0].message(),
            "Unknown attribute: 'clas', possible candidates: 'class'"
        );
    }

    #[test]
    fn test_single_use_conflicts_with_itself() {
        let dm = run(&["class", "class"]);
        assert_eq!(dm.error_count(), 1);
        let diag = &dm.diagnostics()[0];
        assert_eq!(diag.message(), "cannot attach attribute class due to conflict");
        assert_eq!(diag.notes[0].message, "conflicting with attribute class");
        assert_eq!(diag.loc.as_ref().and_then(|l| l.span).map(|s| s.start.column), Some(2));
    }

    #[test]
    fn test_group_conflict_reported_from_both_sides() {
        let dm = run(&["get", "set"]);
        assert_eq!(dm.error_count(), 2);
        assert!(dm.diagnostics()[0].message().contains("attribute get"));
        assert!(dm.diagnostics()[1].message().contains("attribute set"));
    }

    #[test]
    fn test_extra_check_runs_after_conflicts() {
        let dm = run(&["strict", "strict"]);
        let messages: Vec<_> = dm.diagnostics().iter().map(|d| d.message()).collect();
        assert_eq!(
            messages,
            [
                "rejected by strict",
                "cannot attach attribute strict due to conflict",
                "rejected by strict",
            ]
        );
    }

    #[test]
    fn test_wrong_target() {
        let dm = run(&["only_params"]);
        assert_eq!(
            dm.diagnostics()[0].message(),
            "attribute only_params cannot be attached to package p"
        );
    }

    #[test]
    fn test_failed_construction_is_not_attached() {
        let registry = registry();
        let mut pg = PackageGroup::new();
        let pkg = package(&mut pg);
        pg.node_mut(pkg).attrs.push_unchecked(raw("inject", 1));
        let mut dm = DiagnosticsManager::new();
        registry.convert(&mut pg, pkg, &mut dm);
        assert!(pg.node(pkg).attrs.checked.is_empty());
        assert!(pg.node(pkg).attrs.unchecked.is_empty());
        assert_eq!(dm.error_count(), 1);
    }
}
