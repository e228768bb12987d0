//! The declaration arena.

use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::DeclId;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::types::Type;

use super::decl::{DeclKind, DeclNode, DeclTag, PackageDecl, TypeRefDecl, TypeRefKind};

/// Owns every declaration of one compilation.
///
/// Nodes are addressed by [`DeclId`]. Edges between declarations (field
/// types, parent interfaces, imports) are ids as well, so cycles in the
/// source never turn into ownership cycles.
#[derive(Debug, Clone, Default)]
pub struct PackageGroup {
    nodes: Vec<DeclNode>,
    packages: IndexMap<SmolStr, DeclId>,
}

impl PackageGroup {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // ARENA
    // ========================================================================

    /// Store a node and return its handle.
    pub fn alloc(&mut self, node: DeclNode) -> DeclId {
        let id = DeclId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: DeclId) -> &DeclNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: DeclId) -> &mut DeclNode {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: DeclId) -> &DeclKind {
        &self.node(id).kind
    }

    pub fn tag(&self, id: DeclId) -> DeclTag {
        self.node(id).tag()
    }

    pub fn set_parent(&mut self, child: DeclId, parent: DeclId) {
        self.node_mut(child).parent = Some(parent);
    }

    /// Number of allocated nodes, including unreachable ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // PACKAGES
    // ========================================================================

    /// Register a package node under its name.
    pub fn add_package(&mut self, id: DeclId) -> Result<(), Diagnostic> {
        let Some(pkg) = self.package(id) else {
            return Err(Diagnostic::error(
                format!("{} is not a package", self.description(id)),
                self.node(id).loc.clone(),
            ));
        };
        let name = pkg.name.clone();
        if let Some(&prev) = self.packages.get(&name) {
            return Err(self.redefinition(prev, id));
        }
        self.packages.insert(name, id);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.packages.get(name).copied()
    }

    /// Packages in insertion order.
    pub fn packages(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.packages.values().copied()
    }

    pub fn package(&self, id: DeclId) -> Option<&PackageDecl> {
        match self.kind(id) {
            DeclKind::Package(pkg) => Some(pkg),
            _ => None,
        }
    }

    pub fn package_mut(&mut self, id: DeclId) -> Option<&mut PackageDecl> {
        match &mut self.node_mut(id).kind {
            DeclKind::Package(pkg) => Some(pkg),
            _ => None,
        }
    }

    /// The package that (transitively) owns a node.
    pub fn package_of(&self, id: DeclId) -> Option<DeclId> {
        let mut current = id;
        loop {
            if self.tag(current) == DeclTag::Package {
                return Some(current);
            }
            current = self.node(current).parent?;
        }
    }

    /// A package-level declaration of `pkg` by name.
    pub fn lookup_decl(&self, pkg: DeclId, name: &str) -> Option<DeclId> {
        self.package(pkg)?.decls.get(name).copied()
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    pub fn type_ref(&self, id: DeclId) -> Option<&TypeRefDecl> {
        match self.kind(id) {
            DeclKind::TypeRef(ty_ref) => Some(ty_ref),
            _ => None,
        }
    }

    pub fn type_ref_mut(&mut self, id: DeclId) -> Option<&mut TypeRefDecl> {
        match &mut self.node_mut(id).kind {
            DeclKind::TypeRef(ty_ref) => Some(ty_ref),
            _ => None,
        }
    }

    /// The resolved type of a type reference, or of the type reference a
    /// declaration carries (field type, parameter type, return type).
    pub fn resolved_type(&self, id: DeclId) -> Option<&Rc<Type>> {
        let ty_ref = match self.kind(id) {
            DeclKind::TypeRef(_) => id,
            kind => kind.ty_ref()?,
        };
        self.type_ref(ty_ref)?.ty()
    }

    // ========================================================================
    // NAMES
    // ========================================================================

    /// Qualified name: `pkg.Name` for package-level declarations.
    pub fn full_name(&self, id: DeclId) -> String {
        let node = self.node(id);
        let name = node.name().map(SmolStr::as_str).unwrap_or_default();
        if node.tag().is_package_level() {
            if let Some(pkg) = node.parent.and_then(|parent| self.package(parent)) {
                return format!("{}.{}", pkg.name, name);
            }
        }
        name.to_string()
    }

    /// Human-readable description used in diagnostics.
    pub fn description(&self, id: DeclId) -> String {
        match self.kind(id) {
            DeclKind::Package(d) => format!("package {}", d.name),
            DeclKind::PackageImport(d) => format!("package import {}", d.name),
            DeclKind::DeclarationImport(d) => format!("declaration import {}", d.name),
            DeclKind::PackageRef(d) => format!("package reference {}", d.symbol),
            DeclKind::DeclarationRef(d) => format!("declaration reference {}", d.symbol),
            DeclKind::Enum(d) => format!("enum {}", d.name),
            DeclKind::EnumItem(d) => format!("enum item {}", d.name),
            DeclKind::Struct(d) => format!("struct {}", d.name),
            DeclKind::StructField(d) => format!("struct field {}", d.name),
            DeclKind::Union(d) => format!("union {}", d.name),
            DeclKind::UnionField(d) => format!("union field {}", d.name),
            DeclKind::Iface(d) => format!("interface {}", d.name),
            DeclKind::IfaceParent(d) => {
                format!("interface parent ({})", self.description(d.ty_ref))
            }
            DeclKind::IfaceMethod(d) => format!("interface method {}", d.name),
            DeclKind::GlobalFunc(d) => format!("function {}", d.name),
            DeclKind::Param(d) => format!("parameter {}", d.name),
            DeclKind::TypeRef(_) => format!("type reference {}", self.unresolved_repr(id)),
        }
    }

    /// The type reference as written in the source.
    pub fn unresolved_repr(&self, id: DeclId) -> String {
        let Some(ty_ref) = self.type_ref(id) else {
            return self.full_name(id);
        };
        match &ty_ref.kind {
            TypeRefKind::Short { symbol } => symbol.to_string(),
            TypeRefKind::Long { pkg_name, symbol } => format!("{pkg_name}.{symbol}"),
            TypeRefKind::Generic { symbol, args } => {
                let args: Vec<String> = args.iter().map(|a| self.unresolved_repr(*a)).collect();
                format!("{symbol}<{}>", args.join(", "))
            }
            TypeRefKind::Callback { params, ret } => {
                let params: Vec<String> = params
                    .iter()
                    .map(|param| {
                        let name = self.node(*param).name().cloned().unwrap_or_default();
                        match self.kind(*param).ty_ref() {
                            Some(ty) => format!("{name}: {}", self.unresolved_repr(ty)),
                            None => name.to_string(),
                        }
                    })
                    .collect();
                format!("({}) => {}", params.join(", "), self.unresolved_repr(*ret))
            }
            TypeRefKind::Implicit(implicit) => implicit.name().to_string(),
        }
    }

    /// A `DeclRedef` error for `current`, pointing back at `prev`.
    pub fn redefinition(&self, prev: DeclId, current: DeclId) -> Diagnostic {
        let diag = Diagnostic::new(
            DiagnosticKind::DeclRedef {
                decl: self.description(current),
            },
            self.node(current).loc.clone(),
        );
        match &self.node(prev).loc {
            Some(loc) => diag.with_note(Some(loc.clone()), "previously defined here"),
            None => diag,
        }
    }

    // ========================================================================
    // TRAVERSAL
    // ========================================================================

    /// Owned children and followed references, in source order.
    pub fn children(&self, id: DeclId) -> Vec<DeclId> {
        match self.kind(id) {
            DeclKind::Package(d) => d
                .pkg_imports
                .values()
                .chain(d.decl_imports.values())
                .chain(d.decls.values())
                .copied()
                .collect(),
            DeclKind::PackageImport(d) => vec![d.pkg_ref],
            DeclKind::DeclarationImport(d) => vec![d.decl_ref],
            DeclKind::PackageRef(_) => Vec::new(),
            DeclKind::DeclarationRef(d) => vec![d.pkg_ref],
            DeclKind::Enum(d) => std::iter::once(d.ty_ref).chain(d.items.iter().copied()).collect(),
            DeclKind::EnumItem(_) => Vec::new(),
            DeclKind::Struct(d) => d.fields.clone(),
            DeclKind::Union(d) => d.fields.clone(),
            DeclKind::StructField(d) | DeclKind::UnionField(d) => vec![d.ty_ref],
            DeclKind::Iface(d) => d.parents.iter().chain(&d.methods).copied().collect(),
            DeclKind::IfaceParent(d) => vec![d.ty_ref],
            DeclKind::IfaceMethod(d) | DeclKind::GlobalFunc(d) => {
                d.params.iter().copied().chain(std::iter::once(d.ret)).collect()
            }
            DeclKind::Param(d) => vec![d.ty_ref],
            DeclKind::TypeRef(ty_ref) => match &ty_ref.kind {
                TypeRefKind::Generic { args, .. } => args.clone(),
                TypeRefKind::Callback { params, ret } => {
                    params.iter().copied().chain(std::iter::once(*ret)).collect()
                }
                _ => Vec::new(),
            },
        }
    }

    /// Every reachable node, children before parents, packages in
    /// insertion order. Shared nodes appear once.
    pub fn postorder(&self) -> Vec<DeclId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut out = Vec::new();
        for pkg in self.packages() {
            self.postorder_from(pkg, &mut seen, &mut out);
        }
        out
    }

    fn postorder_from(&self, id: DeclId, seen: &mut [bool], out: &mut Vec<DeclId>) {
        if seen[id.index()] {
            return;
        }
        seen[id.index()] = true;
        for child in self.children(id) {
            self.postorder_from(child, seen, out);
        }
        out.push(id);
    }

    /// Package-level declarations of every package, in source order.
    pub fn all_decls(&self) -> Vec<DeclId> {
        self.packages()
            .filter_map(|pkg| self.package(pkg))
            .flat_map(|pkg| pkg.decls.values().copied())
            .collect()
    }
}
