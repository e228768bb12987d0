//! Import and type resolution.
//!
//! Runs in two phases over the post-order walk of the package group:
//!
//! 1. `resolve_imports`: package references, then declaration references
//! 2. `resolve_types`: every type reference, in the context of its holder
//!
//! Each reference caches its outcome exactly once. A failed lookup caches
//! `Invalid` and reports; anything built on top of an `Invalid` reference
//! becomes `Invalid` silently.

use std::rc::Rc;

use smol_str::SmolStr;
use tracing::trace;

use crate::base::DeclId;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsManager};
use crate::ir::{DeclKind, DeclTag, ImplicitType, PackageGroup, Resolution, TypeRefKind};
use crate::types::{
    CallbackSig, GenericError, GenericKind, Type, TypeKind, UserType, builtin_type,
};

/// The family of types a declaration accepts for its type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeUsage {
    /// Return types, callback returns and generic arguments.
    Any,
    /// Fields and parameters.
    NonVoid,
    /// Interface parents.
    Iface,
    /// The underlying type of an enum: a scalar or `String`.
    EnumBase,
}

impl TypeUsage {
    pub fn accepts(&self, ty: &Type) -> bool {
        match self {
            TypeUsage::Any => true,
            TypeUsage::NonVoid => !ty.is_void(),
            TypeUsage::Iface => ty.as_iface().is_some(),
            TypeUsage::EnumBase => ty.as_scalar().is_some() || ty.is_string(),
        }
    }

    /// The usage a holder declaration imposes on its type reference.
    pub fn of_holder(kind: &DeclKind) -> Option<TypeUsage> {
        match kind {
            DeclKind::Param(_) | DeclKind::StructField(_) | DeclKind::UnionField(_) => {
                Some(TypeUsage::NonVoid)
            }
            DeclKind::IfaceParent(_) => Some(TypeUsage::Iface),
            DeclKind::Enum(_) => Some(TypeUsage::EnumBase),
            DeclKind::IfaceMethod(_) | DeclKind::GlobalFunc(_) => Some(TypeUsage::Any),
            _ => None,
        }
    }
}

/// Run both resolution phases.
pub fn resolve(pg: &mut PackageGroup, dm: &mut DiagnosticsManager) {
    let mut resolver = Resolver::new(pg, dm);
    resolver.resolve_imports();
    resolver.resolve_types();
}

/// Resolves references of one package group in place.
pub struct Resolver<'a> {
    pg: &'a mut PackageGroup,
    dm: &'a mut DiagnosticsManager,
}

impl<'a> Resolver<'a> {
    pub fn new(pg: &'a mut PackageGroup, dm: &'a mut DiagnosticsManager) -> Self {
        Self { pg, dm }
    }

    fn report(&mut self, kind: DiagnosticKind, at: DeclId) {
        let loc = self.pg.node(at).loc.clone();
        self.dm.emit(Diagnostic::new(kind, loc));
    }

    // ========================================================================
    // IMPORTS
    // ========================================================================

    pub fn resolve_imports(&mut self) {
        for id in self.pg.postorder() {
            match self.pg.tag(id) {
                DeclTag::PackageRef => {
                    self.resolve_package_ref(id);
                }
                DeclTag::DeclarationRef => {
                    self.resolve_declaration_ref(id);
                }
                _ => {}
            }
        }
    }

    /// The package a package reference names, resolving it on first use.
    pub fn resolve_package_ref(&mut self, id: DeclId) -> Option<DeclId> {
        let DeclKind::PackageRef(d) = self.pg.kind(id) else {
            return None;
        };
        if let Some(resolved) = &d.resolved {
            return resolved.ok().copied();
        }
        let symbol = d.symbol.clone();
        let found = self.pg.lookup(&symbol);
        trace!(package = %symbol, found = found.is_some(), "resolve package reference");
        if found.is_none() {
            self.report(DiagnosticKind::PackageNotExist { name: symbol }, id);
        }
        if let DeclKind::PackageRef(d) = &mut self.pg.node_mut(id).kind {
            d.resolved = Some(Resolution::from_option(found));
        }
        found
    }

    /// The declaration a declaration reference names. An unresolved
    /// package has already been reported and stays silent here.
    pub fn resolve_declaration_ref(&mut self, id: DeclId) -> Option<DeclId> {
        let DeclKind::DeclarationRef(d) = self.pg.kind(id) else {
            return None;
        };
        if let Some(resolved) = &d.resolved {
            return resolved.ok().copied();
        }
        let (symbol, pkg_ref) = (d.symbol.clone(), d.pkg_ref);
        let found = match self.resolve_package_ref(pkg_ref) {
            Some(pkg) => {
                let decl = self.pg.lookup_decl(pkg, &symbol);
                if decl.is_none() {
                    self.report(DiagnosticKind::DeclNotExist { name: symbol.clone() }, id);
                }
                decl
            }
            None => None,
        };
        trace!(symbol = %symbol, found = found.is_some(), "resolve declaration reference");
        if let DeclKind::DeclarationRef(d) = &mut self.pg.node_mut(id).kind {
            d.resolved = Some(Resolution::from_option(found));
        }
        found
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    pub fn resolve_types(&mut self) {
        for id in self.pg.postorder() {
            let kind = self.pg.kind(id);
            let (Some(usage), Some(ty_ref)) = (TypeUsage::of_holder(kind), kind.ty_ref()) else {
                continue;
            };
            self.resolve_type_ref(ty_ref, usage);
        }
    }

    /// Resolve a type reference and check it against `usage`.
    ///
    /// Returns the cached result when the reference was already resolved;
    /// the same `Rc` is handed out every time.
    pub fn resolve_type_ref(&mut self, id: DeclId, usage: TypeUsage) -> Option<Rc<Type>> {
        let ty_ref = self.pg.type_ref(id)?;
        if let Some(resolved) = &ty_ref.resolved {
            return resolved.ok().cloned();
        }
        let kind = ty_ref.kind.clone();
        let ty = match self.pg.package_of(id) {
            Some(pkg) => self.construct(id, pkg, &kind),
            None => None,
        };
        let ty = match ty {
            Some(ty) if !usage.accepts(&ty) => {
                self.report(DiagnosticKind::TypeUsage { ty: ty.signature() }, id);
                None
            }
            other => other.map(Rc::new),
        };
        trace!(
            ty_ref = %self.pg.unresolved_repr(id),
            resolved = ?ty.as_ref().map(|ty| ty.signature()),
            "resolve type reference"
        );
        if let Some(ty_ref) = self.pg.type_ref_mut(id) {
            ty_ref.resolved = Some(Resolution::from_option(ty.clone()));
        }
        ty
    }

    fn construct(&mut self, id: DeclId, pkg: DeclId, kind: &TypeRefKind) -> Option<Type> {
        match kind {
            TypeRefKind::Implicit(ImplicitType::Void) => Some(Type::new(id, TypeKind::Void)),
            TypeRefKind::Implicit(ImplicitType::Unit) => Some(Type::new(id, TypeKind::Unit)),
            TypeRefKind::Short { symbol } => self.resolve_short(id, pkg, symbol),
            TypeRefKind::Long { pkg_name, symbol } => self.resolve_long(id, pkg, pkg_name, symbol),
            TypeRefKind::Generic { symbol, args } => self.resolve_generic(id, symbol, args),
            TypeRefKind::Callback { params, ret } => self.resolve_callback(id, params, *ret),
        }
    }

    /// Builtins first, then the current package, then symbol imports.
    fn resolve_short(&mut self, id: DeclId, pkg: DeclId, symbol: &SmolStr) -> Option<Type> {
        if let Some(ty) = builtin_type(symbol, id) {
            return Some(ty);
        }
        if let Some(decl) = self.pg.lookup_decl(pkg, symbol) {
            return self.user_type(decl, id, symbol);
        }
        let import = self
            .pg
            .package(pkg)
            .and_then(|p| p.decl_imports.get(symbol).copied());
        if let Some(import) = import {
            let DeclKind::DeclarationImport(d) = self.pg.kind(import) else {
                return None;
            };
            let decl_ref = d.decl_ref;
            let decl = self.resolve_declaration_ref(decl_ref)?;
            return self.user_type(decl, id, symbol);
        }
        self.report(
            DiagnosticKind::DeclarationNotInScope {
                name: symbol.clone(),
            },
            id,
        );
        None
    }

    /// `pkg.Name`: the package must be imported by the current package.
    fn resolve_long(
        &mut self,
        id: DeclId,
        pkg: DeclId,
        pkg_name: &SmolStr,
        symbol: &SmolStr,
    ) -> Option<Type> {
        let import = self
            .pg
            .package(pkg)
            .and_then(|p| p.pkg_imports.get(pkg_name).copied());
        let Some(import) = import else {
            self.report(
                DiagnosticKind::PackageNotInScope {
                    name: pkg_name.clone(),
                },
                id,
            );
            return None;
        };
        let DeclKind::PackageImport(d) = self.pg.kind(import) else {
            return None;
        };
        let pkg_ref = d.pkg_ref;
        let target = self.resolve_package_ref(pkg_ref)?;
        match self.pg.lookup_decl(target, symbol) {
            Some(decl) => self.user_type(decl, id, symbol),
            None => {
                self.report(
                    DiagnosticKind::DeclNotExist {
                        name: symbol.clone(),
                    },
                    id,
                );
                None
            }
        }
    }

    fn resolve_generic(&mut self, id: DeclId, symbol: &SmolStr, args: &[DeclId]) -> Option<Type> {
        let Some(generic) = GenericKind::from_name(symbol) else {
            self.report(
                DiagnosticKind::DeclarationNotInScope {
                    name: symbol.clone(),
                },
                id,
            );
            return None;
        };
        // Resolve every argument before bailing out so each one is cached.
        let resolved: Vec<Option<Rc<Type>>> = args
            .iter()
            .map(|&arg| self.resolve_type_ref(arg, TypeUsage::Any))
            .collect();
        let resolved: Vec<Rc<Type>> = resolved.into_iter().collect::<Option<_>>()?;
        match generic.construct(id, &resolved) {
            Ok(ty) => Some(ty),
            Err(GenericError::Arity { expected, got }) => {
                self.report(
                    DiagnosticKind::GenericArguments {
                        ty_ref: self.pg.description(id),
                        expected,
                        got,
                    },
                    id,
                );
                None
            }
            Err(GenericError::VoidArgument(index)) => {
                self.report(
                    DiagnosticKind::TypeUsage {
                        ty: resolved[index].signature(),
                    },
                    args[index],
                );
                None
            }
        }
    }

    fn resolve_callback(&mut self, id: DeclId, params: &[DeclId], ret: DeclId) -> Option<Type> {
        let mut sig_params = Vec::with_capacity(params.len());
        let mut complete = true;
        for &param in params {
            let DeclKind::Param(p) = self.pg.kind(param) else {
                continue;
            };
            let (name, ty_ref) = (p.name.clone(), p.ty_ref);
            match self.resolve_type_ref(ty_ref, TypeUsage::NonVoid) {
                Some(ty) => sig_params.push((name, ty)),
                None => complete = false,
            }
        }
        let ret = self.resolve_type_ref(ret, TypeUsage::Any);
        if !complete {
            return None;
        }
        Some(Type::new(
            id,
            TypeKind::Callback(CallbackSig {
                params: sig_params,
                ret: ret?,
            }),
        ))
    }

    /// The type a user declaration denotes, or `NotAType`.
    fn user_type(&mut self, decl: DeclId, origin: DeclId, symbol: &SmolStr) -> Option<Type> {
        let user = UserType {
            decl,
            full_name: self.pg.full_name(decl).into(),
        };
        let kind = match self.pg.tag(decl) {
            DeclTag::Enum => TypeKind::Enum(user),
            DeclTag::Struct => TypeKind::Struct(user),
            DeclTag::Union => TypeKind::Union(user),
            DeclTag::Iface => TypeKind::Iface(user),
            _ => {
                self.report(
                    DiagnosticKind::NotAType {
                        name: symbol.clone(),
                    },
                    origin,
                );
                return None;
            }
        };
        Some(Type::new(origin, kind))
    }
}
