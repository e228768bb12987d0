//! Declaration node payloads.

use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{DeclId, SourceLocation};
use crate::types::Type;

use super::{AttributeSet, ConstValue};

/// The memoized outcome of resolving a reference.
///
/// `Invalid` means resolution was attempted and failed; the failure has
/// already been reported and users of the reference stay silent.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Resolved(T),
    Invalid,
}

impl<T> Resolution<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Resolution::Resolved(value),
            None => Resolution::Invalid,
        }
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Resolution::Resolved(value) => Some(value),
            Resolution::Invalid => None,
        }
    }
}

/// Declaration kinds without payload, used for attribute targets and
/// quick dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclTag {
    Package,
    PackageImport,
    DeclarationImport,
    PackageRef,
    DeclarationRef,
    Enum,
    EnumItem,
    Struct,
    StructField,
    Union,
    UnionField,
    Iface,
    IfaceParent,
    IfaceMethod,
    GlobalFunc,
    Param,
    TypeRef,
}

impl DeclTag {
    /// Declarations that live directly in a package namespace.
    pub fn is_package_level(&self) -> bool {
        matches!(
            self,
            DeclTag::Enum | DeclTag::Struct | DeclTag::Union | DeclTag::Iface | DeclTag::GlobalFunc
        )
    }

    /// Declarations that can be named as types.
    pub fn is_type_decl(&self) -> bool {
        matches!(
            self,
            DeclTag::Enum | DeclTag::Struct | DeclTag::Union | DeclTag::Iface
        )
    }
}

// ============================================================================
// PACKAGES AND IMPORTS
// ============================================================================

#[derive(Debug, Clone)]
pub struct PackageDecl {
    pub name: SmolStr,
    pub is_stdlib: bool,
    /// Package-level declarations by name, in source order.
    pub decls: IndexMap<SmolStr, DeclId>,
    /// `use a.b [as c];` by local name.
    pub pkg_imports: IndexMap<SmolStr, DeclId>,
    /// `from a.b use C [as D];` by local name.
    pub decl_imports: IndexMap<SmolStr, DeclId>,
}

impl PackageDecl {
    pub fn new(name: impl Into<SmolStr>, is_stdlib: bool) -> Self {
        Self {
            name: name.into(),
            is_stdlib,
            decls: IndexMap::new(),
            pkg_imports: IndexMap::new(),
            decl_imports: IndexMap::new(),
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split('.')
    }
}

#[derive(Debug, Clone)]
pub struct PackageImportDecl {
    /// Local name: the alias, or the dotted package name.
    pub name: SmolStr,
    pub pkg_ref: DeclId,
    pub is_alias: bool,
}

#[derive(Debug, Clone)]
pub struct DeclarationImportDecl {
    pub name: SmolStr,
    pub decl_ref: DeclId,
    pub is_alias: bool,
}

#[derive(Debug, Clone)]
pub struct PackageRefDecl {
    pub symbol: SmolStr,
    /// The referenced package node.
    pub resolved: Option<Resolution<DeclId>>,
}

#[derive(Debug, Clone)]
pub struct DeclarationRefDecl {
    pub symbol: SmolStr,
    pub pkg_ref: DeclId,
    /// The referenced package-level declaration.
    pub resolved: Option<Resolution<DeclId>>,
}

// ============================================================================
// TYPE DECLARATIONS
// ============================================================================

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: SmolStr,
    pub ty_ref: DeclId,
    pub items: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct EnumItemDecl {
    pub name: SmolStr,
    /// Explicit value from source; filled in by the enum check otherwise.
    pub value: Option<ConstValue>,
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: SmolStr,
    pub fields: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: SmolStr,
    pub ty_ref: DeclId,
}

#[derive(Debug, Clone)]
pub struct UnionDecl {
    pub name: SmolStr,
    pub fields: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct IfaceDecl {
    pub name: SmolStr,
    pub parents: Vec<DeclId>,
    pub methods: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct IfaceParentDecl {
    pub ty_ref: DeclId,
}

/// An interface method or a global function.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: SmolStr,
    pub params: Vec<DeclId>,
    pub ret: DeclId,
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: SmolStr,
    pub ty_ref: DeclId,
}

// ============================================================================
// TYPE REFERENCES
// ============================================================================

/// What an omitted type stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplicitType {
    Void,
    Unit,
}

impl ImplicitType {
    pub fn name(&self) -> &'static str {
        match self {
            ImplicitType::Void => "void",
            ImplicitType::Unit => "unit",
        }
    }
}

#[derive(Debug, Clone)]
pub enum TypeRefKind {
    Short { symbol: SmolStr },
    Long { pkg_name: SmolStr, symbol: SmolStr },
    Generic { symbol: SmolStr, args: Vec<DeclId> },
    /// `params` are `Param` nodes, `ret` a type reference.
    Callback { params: Vec<DeclId>, ret: DeclId },
    /// No type written in the source.
    Implicit(ImplicitType),
}

#[derive(Debug, Clone)]
pub struct TypeRefDecl {
    pub kind: TypeRefKind,
    /// Set exactly once by the resolution pass.
    pub resolved: Option<Resolution<Rc<Type>>>,
}

impl TypeRefDecl {
    pub fn new(kind: TypeRefKind) -> Self {
        Self {
            kind,
            resolved: None,
        }
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self.kind, TypeRefKind::Implicit(_))
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// The resolved type, if resolution succeeded.
    pub fn ty(&self) -> Option<&Rc<Type>> {
        self.resolved.as_ref().and_then(Resolution::ok)
    }
}

// ============================================================================
// NODES
// ============================================================================

#[derive(Debug, Clone)]
pub enum DeclKind {
    Package(PackageDecl),
    PackageImport(PackageImportDecl),
    DeclarationImport(DeclarationImportDecl),
    PackageRef(PackageRefDecl),
    DeclarationRef(DeclarationRefDecl),
    Enum(EnumDecl),
    EnumItem(EnumItemDecl),
    Struct(StructDecl),
    StructField(FieldDecl),
    Union(UnionDecl),
    UnionField(FieldDecl),
    Iface(IfaceDecl),
    IfaceParent(IfaceParentDecl),
    IfaceMethod(FuncDecl),
    GlobalFunc(FuncDecl),
    Param(ParamDecl),
    TypeRef(TypeRefDecl),
}

impl DeclKind {
    pub fn tag(&self) -> DeclTag {
        match self {
            DeclKind::Package(_) => DeclTag::Package,
            DeclKind::PackageImport(_) => DeclTag::PackageImport,
            DeclKind::DeclarationImport(_) => DeclTag::DeclarationImport,
            DeclKind::PackageRef(_) => DeclTag::PackageRef,
            DeclKind::DeclarationRef(_) => DeclTag::DeclarationRef,
            DeclKind::Enum(_) => DeclTag::Enum,
            DeclKind::EnumItem(_) => DeclTag::EnumItem,
            DeclKind::Struct(_) => DeclTag::Struct,
            DeclKind::StructField(_) => DeclTag::StructField,
            DeclKind::Union(_) => DeclTag::Union,
            DeclKind::UnionField(_) => DeclTag::UnionField,
            DeclKind::Iface(_) => DeclTag::Iface,
            DeclKind::IfaceParent(_) => DeclTag::IfaceParent,
            DeclKind::IfaceMethod(_) => DeclTag::IfaceMethod,
            DeclKind::GlobalFunc(_) => DeclTag::GlobalFunc,
            DeclKind::Param(_) => DeclTag::Param,
            DeclKind::TypeRef(_) => DeclTag::TypeRef,
        }
    }

    /// The declared name, for kinds that have one.
    pub fn name(&self) -> Option<&SmolStr> {
        match self {
            DeclKind::Package(d) => Some(&d.name),
            DeclKind::PackageImport(d) => Some(&d.name),
            DeclKind::DeclarationImport(d) => Some(&d.name),
            DeclKind::PackageRef(d) => Some(&d.symbol),
            DeclKind::DeclarationRef(d) => Some(&d.symbol),
            DeclKind::Enum(d) => Some(&d.name),
            DeclKind::EnumItem(d) => Some(&d.name),
            DeclKind::Struct(d) => Some(&d.name),
            DeclKind::StructField(d) | DeclKind::UnionField(d) => Some(&d.name),
            DeclKind::Union(d) => Some(&d.name),
            DeclKind::Iface(d) => Some(&d.name),
            DeclKind::IfaceMethod(d) | DeclKind::GlobalFunc(d) => Some(&d.name),
            DeclKind::Param(d) => Some(&d.name),
            DeclKind::IfaceParent(_) | DeclKind::TypeRef(_) => None,
        }
    }

    /// The type reference a declaration carries as its own type.
    pub fn ty_ref(&self) -> Option<DeclId> {
        match self {
            DeclKind::Enum(d) => Some(d.ty_ref),
            DeclKind::StructField(d) | DeclKind::UnionField(d) => Some(d.ty_ref),
            DeclKind::IfaceParent(d) => Some(d.ty_ref),
            DeclKind::IfaceMethod(d) | DeclKind::GlobalFunc(d) => Some(d.ret),
            DeclKind::Param(d) => Some(d.ty_ref),
            _ => None,
        }
    }
}

/// One node of the declaration arena.
#[derive(Debug, Clone)]
pub struct DeclNode {
    pub loc: Option<SourceLocation>,
    /// The owning node; `None` for packages and for nodes that were
    /// dropped as redefinitions.
    pub parent: Option<DeclId>,
    pub kind: DeclKind,
    pub attrs: AttributeSet,
}

impl DeclNode {
    pub fn new(kind: DeclKind, loc: Option<SourceLocation>) -> Self {
        Self {
            loc,
            parent: None,
            kind,
            attrs: AttributeSet::default(),
        }
    }

    pub fn tag(&self) -> DeclTag {
        self.kind.tag()
    }

    pub fn name(&self) -> Option<&SmolStr> {
        self.kind.name()
    }
}
