//! Parse tree to declaration graph.

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::base::{DeclId, SourceLocation, Span};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsManager};
use crate::ir::{
    Argument, DeclKind, DeclNode, DeclarationImportDecl, DeclarationRefDecl, EnumDecl,
    EnumItemDecl, FieldDecl, FuncDecl, IfaceDecl, IfaceParentDecl, ImplicitType, PackageDecl,
    PackageGroup, PackageImportDecl, PackageRefDecl, ParamDecl, StructDecl, TypeRefDecl,
    TypeRefKind, UncheckedAttribute, UnionDecl,
};
use crate::syntax::{
    Attr, Decl, Enum, GlobalFunction, Interface, InterfaceFunction, Node, Parameter, Spec,
    Struct, Token, TypeExpr, TypeExprKind, Union, Use, UsePackage, UseSymbol,
};

use super::eval::{self, EvalError};

/// Whether `name` is a valid dotted package name.
///
/// Every segment must be non-empty, start with a letter or `_`, and
/// continue with letters, digits or `_`.
pub fn is_valid_package_name(name: &str) -> bool {
    name.split('.').all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}

/// Where a parse tree came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub file: SmolStr,
    pub pkg_name: SmolStr,
    pub is_stdlib: bool,
}

/// Convert one parse tree into a package and register it in `pg`.
///
/// Diagnostics inside the package are emitted to `dm` and the offending
/// declaration is dropped. An invalid package name or a package that is
/// already registered is returned as the error; nothing is registered then.
pub fn convert(
    spec: &Spec,
    source: &SourceInfo,
    pg: &mut PackageGroup,
    dm: &mut DiagnosticsManager,
) -> Result<DeclId, Diagnostic> {
    if !is_valid_package_name(&source.pkg_name) {
        return Err(Diagnostic::new(
            DiagnosticKind::InvalidPackageName {
                name: source.pkg_name.clone(),
            },
            Some(SourceLocation::file(source.file.clone())),
        ));
    }
    let mut converter = AstConverter {
        file: source.file.clone(),
        pg,
        dm,
    };
    let pkg = converter.convert_spec(spec, source);
    converter.pg.add_package(pkg)?;
    debug!(package = %source.pkg_name, file = %source.file, "converted source");
    Ok(pkg)
}

/// Builds declaration nodes for one source file.
pub struct AstConverter<'a> {
    file: SmolStr,
    pg: &'a mut PackageGroup,
    dm: &'a mut DiagnosticsManager,
}

impl<'a> AstConverter<'a> {
    pub fn new(file: impl Into<SmolStr>, pg: &'a mut PackageGroup, dm: &'a mut DiagnosticsManager) -> Self {
        Self {
            file: file.into(),
            pg,
            dm,
        }
    }

    fn loc(&self, span: Option<Span>) -> Option<SourceLocation> {
        Some(SourceLocation {
            file: self.file.clone(),
            span,
        })
    }

    fn alloc(&mut self, kind: DeclKind, span: Option<Span>) -> DeclId {
        let loc = self.loc(span);
        self.pg.alloc(DeclNode::new(kind, loc))
    }

    fn adopt(&mut self, parent: DeclId, children: &[DeclId]) {
        for &child in children {
            self.pg.set_parent(child, parent);
        }
    }

    /// Keep the first node of every name; later ones are reported and
    /// dropped.
    fn unique(&mut self, ids: Vec<DeclId>) -> Vec<DeclId> {
        let mut by_name: IndexMap<SmolStr, DeclId> = IndexMap::new();
        let mut kept = Vec::with_capacity(ids.len());
        for id in ids {
            let name = self.pg.node(id).name().cloned().unwrap_or_default();
            match by_name.entry(name) {
                Entry::Occupied(prev) => {
                    let diag = self.pg.redefinition(*prev.get(), id);
                    self.dm.emit(diag);
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                    kept.push(id);
                }
            }
        }
        kept
    }

    fn eval_error(&self, err: EvalError) -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::ConstEval {
                message: err.message,
            },
            self.loc(err.span),
        )
    }

    // ========================================================================
    // ATTRIBUTES
    // ========================================================================

    fn add_attrs(&mut self, owner: DeclId, attrs: &[Attr]) {
        for attr in attrs {
            match self.unchecked_attr(attr) {
                Ok(unchecked) => self.pg.node_mut(owner).attrs.push_unchecked(unchecked),
                Err(diag) => self.dm.emit(diag),
            }
        }
    }

    fn unchecked_attr(&self, attr: &Attr) -> Result<UncheckedAttribute, Diagnostic> {
        let args = attr
            .args
            .iter()
            .map(|arg| {
                let value = eval::eval(&arg.val).map_err(|err| self.eval_error(err))?;
                Ok(Argument {
                    key: arg.key.as_ref().map(|key| key.ident()),
                    value,
                    loc: self.loc(arg.span.or(attr.name.span)),
                })
            })
            .collect::<Result<Vec<_>, Diagnostic>>()?;
        Ok(UncheckedAttribute {
            name: attr.name.ident(),
            args,
            loc: self.loc(attr.name.span),
        })
    }

    // ========================================================================
    // TYPE REFERENCES
    // ========================================================================

    fn type_ref(&mut self, ty: &TypeExpr) -> DeclId {
        let (kind, children) = match &ty.kind {
            TypeExprKind::Short { name } => (TypeRefKind::Short { symbol: name.ident() }, Vec::new()),
            TypeExprKind::Long { pkg_name, name } => (
                TypeRefKind::Long {
                    pkg_name: pkg_name.dotted().into(),
                    symbol: name.ident(),
                },
                Vec::new(),
            ),
            TypeExprKind::Generic { name, args } => {
                let args: Vec<DeclId> = args.iter().map(|arg| self.type_ref(arg)).collect();
                (
                    TypeRefKind::Generic {
                        symbol: name.ident(),
                        args: args.clone(),
                    },
                    args,
                )
            }
            TypeExprKind::Callback { params, ret } => {
                let params = self.params(params);
                let ret = match ret {
                    Some(ret) => self.type_ref(ret),
                    None => self.implicit(ImplicitType::Void, ty.span),
                };
                let mut children = params.clone();
                children.push(ret);
                (TypeRefKind::Callback { params, ret }, children)
            }
        };
        let id = self.alloc(DeclKind::TypeRef(TypeRefDecl::new(kind)), ty.span);
        self.adopt(id, &children);
        self.add_attrs(id, &ty.attrs);
        trace!(ty_ref = %self.pg.unresolved_repr(id), "converted type reference");
        id
    }

    fn implicit(&mut self, implicit: ImplicitType, span: Option<Span>) -> DeclId {
        self.alloc(
            DeclKind::TypeRef(TypeRefDecl::new(TypeRefKind::Implicit(implicit))),
            span,
        )
    }

    fn param(&mut self, param: &Parameter) -> DeclId {
        let ty_ref = self.type_ref(&param.ty);
        let id = self.alloc(
            DeclKind::Param(ParamDecl {
                name: param.name.ident(),
                ty_ref,
            }),
            param.name.span,
        );
        self.pg.set_parent(ty_ref, id);
        self.add_attrs(id, &param.attrs);
        id
    }

    fn params(&mut self, params: &[Parameter]) -> Vec<DeclId> {
        let ids = params.iter().map(|param| self.param(param)).collect();
        self.unique(ids)
    }

    // ========================================================================
    // USES
    // ========================================================================

    fn use_package(&mut self, node: &UsePackage) -> DeclId {
        let symbol: SmolStr = node.pkg_name.dotted().into();
        let pkg_ref = self.alloc(
            DeclKind::PackageRef(PackageRefDecl {
                symbol: symbol.clone(),
                resolved: None,
            }),
            node.pkg_name.span,
        );
        let (name, span, is_alias) = match &node.alias {
            Some(alias) => (alias.ident(), alias.span, true),
            None => (symbol, node.pkg_name.span, false),
        };
        let id = self.alloc(
            DeclKind::PackageImport(PackageImportDecl {
                name,
                pkg_ref,
                is_alias,
            }),
            span,
        );
        self.pg.set_parent(pkg_ref, id);
        id
    }

    fn use_symbol(&mut self, node: &UseSymbol) -> Vec<DeclId> {
        let pkg_ref = self.alloc(
            DeclKind::PackageRef(PackageRefDecl {
                symbol: node.pkg_name.dotted().into(),
                resolved: None,
            }),
            node.pkg_name.span,
        );
        let mut imports = Vec::with_capacity(node.pairs.len());
        for pair in &node.pairs {
            let decl_ref = self.alloc(
                DeclKind::DeclarationRef(DeclarationRefDecl {
                    symbol: pair.name.ident(),
                    pkg_ref,
                    resolved: None,
                }),
                pair.name.span,
            );
            let (name, span, is_alias) = match &pair.alias {
                Some(alias) => (alias.ident(), alias.span, true),
                None => (pair.name.ident(), pair.name.span, false),
            };
            let id = self.alloc(
                DeclKind::DeclarationImport(DeclarationImportDecl {
                    name,
                    decl_ref,
                    is_alias,
                }),
                span,
            );
            self.pg.set_parent(decl_ref, id);
            if self.pg.node(pkg_ref).parent.is_none() {
                self.pg.set_parent(pkg_ref, decl_ref);
            }
            imports.push(id);
        }
        imports
    }

    // ========================================================================
    // DECLARATIONS
    // ========================================================================

    fn decl(&mut self, decl: &Decl) -> DeclId {
        match decl {
            Decl::Struct(node) => self.struct_decl(node),
            Decl::Enum(node) => self.enum_decl(node),
            Decl::Union(node) => self.union_decl(node),
            Decl::Interface(node) => self.iface_decl(node),
            Decl::Function(node) => self.global_func(node),
        }
    }

    fn struct_decl(&mut self, node: &Struct) -> DeclId {
        let fields: Vec<DeclId> = node
            .fields
            .iter()
            .map(|field| {
                let ty_ref = self.type_ref(&field.ty);
                let id = self.alloc(
                    DeclKind::StructField(FieldDecl {
                        name: field.name.ident(),
                        ty_ref,
                    }),
                    field.name.span,
                );
                self.pg.set_parent(ty_ref, id);
                self.add_attrs(id, &field.attrs);
                id
            })
            .collect();
        let fields = self.unique(fields);
        let id = self.alloc(
            DeclKind::Struct(StructDecl {
                name: node.name.ident(),
                fields: fields.clone(),
            }),
            node.name.span,
        );
        self.adopt(id, &fields);
        self.add_attrs(id, &node.attrs);
        self.add_attrs(id, &node.inner_attrs);
        id
    }

    fn enum_decl(&mut self, node: &Enum) -> DeclId {
        let ty_ref = self.type_ref(&node.ty);
        let mut items = Vec::with_capacity(node.items.len());
        for item in &node.items {
            let value = match item.val.as_ref().map(eval::eval).transpose() {
                Ok(value) => value,
                Err(err) => {
                    let diag = self.eval_error(err);
                    self.dm.emit(diag);
                    continue;
                }
            };
            let id = self.alloc(
                DeclKind::EnumItem(EnumItemDecl {
                    name: item.name.ident(),
                    value,
                }),
                item.name.span,
            );
            self.add_attrs(id, &item.attrs);
            items.push(id);
        }
        let items = self.unique(items);
        let id = self.alloc(
            DeclKind::Enum(EnumDecl {
                name: node.name.ident(),
                ty_ref,
                items: items.clone(),
            }),
            node.name.span,
        );
        self.pg.set_parent(ty_ref, id);
        self.adopt(id, &items);
        self.add_attrs(id, &node.attrs);
        id
    }

    fn union_decl(&mut self, node: &Union) -> DeclId {
        let fields: Vec<DeclId> = node
            .fields
            .iter()
            .map(|field| {
                let ty_ref = match &field.ty {
                    Some(ty) => self.type_ref(ty),
                    None => self.implicit(ImplicitType::Unit, field.name.span),
                };
                let id = self.alloc(
                    DeclKind::UnionField(FieldDecl {
                        name: field.name.ident(),
                        ty_ref,
                    }),
                    field.name.span,
                );
                self.pg.set_parent(ty_ref, id);
                self.add_attrs(id, &field.attrs);
                id
            })
            .collect();
        let fields = self.unique(fields);
        let id = self.alloc(
            DeclKind::Union(UnionDecl {
                name: node.name.ident(),
                fields: fields.clone(),
            }),
            node.name.span,
        );
        self.adopt(id, &fields);
        self.add_attrs(id, &node.attrs);
        self.add_attrs(id, &node.inner_attrs);
        id
    }

    /// Shared by interface methods and global functions.
    fn func(
        &mut self,
        name: &Token,
        params: &[Parameter],
        ret: Option<&TypeExpr>,
        wrap: fn(FuncDecl) -> DeclKind,
    ) -> DeclId {
        let params = self.params(params);
        let ret = match ret {
            Some(ty) => self.type_ref(ty),
            None => self.implicit(ImplicitType::Void, name.span),
        };
        let id = self.alloc(
            wrap(FuncDecl {
                name: name.ident(),
                params: params.clone(),
                ret,
            }),
            name.span,
        );
        self.adopt(id, &params);
        self.pg.set_parent(ret, id);
        id
    }

    fn iface_method(&mut self, node: &InterfaceFunction) -> DeclId {
        let id = self.func(&node.name, &node.params, node.ret.as_ref(), DeclKind::IfaceMethod);
        self.add_attrs(id, &node.attrs);
        id
    }

    fn iface_decl(&mut self, node: &Interface) -> DeclId {
        let methods: Vec<DeclId> = node.methods.iter().map(|m| self.iface_method(m)).collect();
        let methods = self.unique(methods);
        let parents: Vec<DeclId> = node
            .extends
            .iter()
            .map(|extend| {
                let ty_ref = self.type_ref(&extend.ty);
                let id = self.alloc(
                    DeclKind::IfaceParent(IfaceParentDecl { ty_ref }),
                    extend.ty.span,
                );
                self.pg.set_parent(ty_ref, id);
                self.add_attrs(id, &extend.attrs);
                id
            })
            .collect();
        let id = self.alloc(
            DeclKind::Iface(IfaceDecl {
                name: node.name.ident(),
                parents: parents.clone(),
                methods: methods.clone(),
            }),
            node.name.span,
        );
        self.adopt(id, &parents);
        self.adopt(id, &methods);
        self.add_attrs(id, &node.attrs);
        self.add_attrs(id, &node.inner_attrs);
        id
    }

    fn global_func(&mut self, node: &GlobalFunction) -> DeclId {
        let id = self.func(&node.name, &node.params, node.ret.as_ref(), DeclKind::GlobalFunc);
        self.add_attrs(id, &node.attrs);
        id
    }

    // ========================================================================
    // PACKAGE
    // ========================================================================

    /// Build the package node for `spec` without registering it.
    pub fn convert_spec(&mut self, spec: &Spec, source: &SourceInfo) -> DeclId {
        let pkg = self.pg.alloc(DeclNode::new(
            DeclKind::Package(PackageDecl::new(source.pkg_name.clone(), source.is_stdlib)),
            Some(SourceLocation::file(self.file.clone())),
        ));

        for item in &spec.uses {
            match item {
                Use::Package(node) => {
                    let import = self.use_package(node);
                    self.register(pkg, import, pkg_imports);
                }
                Use::Symbol(node) => {
                    for import in self.use_symbol(node) {
                        self.register(pkg, import, decl_imports);
                    }
                }
            }
        }
        for decl in &spec.decls {
            trace!(kind = %decl.kind(), "converting declaration");
            let id = self.decl(decl);
            self.register(pkg, id, decls);
        }
        self.add_attrs(pkg, &spec.inner_attrs);
        pkg
    }

    /// Insert `child` into one of the package tables, reporting a
    /// redefinition if the name is taken.
    fn register(
        &mut self,
        pkg: DeclId,
        child: DeclId,
        table: fn(&mut PackageDecl) -> &mut Table,
    ) {
        let name = self.pg.node(child).name().cloned().unwrap_or_default();
        let prev = self
            .pg
            .package_mut(pkg)
            .and_then(|p| table(p).get(&name).copied());
        if let Some(prev) = prev {
            let diag = self.pg.redefinition(prev, child);
            self.dm.emit(diag);
            return;
        }
        if let Some(p) = self.pg.package_mut(pkg) {
            table(p).insert(name, child);
        }
        self.pg.set_parent(child, pkg);
    }
}

type Table = IndexMap<SmolStr, DeclId>;

fn pkg_imports(pkg: &mut PackageDecl) -> &mut Table {
    &mut pkg.pkg_imports
}

fn decl_imports(pkg: &mut PackageDecl) -> &mut Table {
    &mut pkg.decl_imports
}

fn decls(pkg: &mut PackageDecl) -> &mut Table {
    &mut pkg.decls
}
