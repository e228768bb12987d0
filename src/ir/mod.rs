//! The declaration graph.
//!
//! One [`PackageGroup`] arena holds every package, declaration, import and
//! type reference of a compilation. Conversion builds it once; the semantic
//! passes then fill in resolutions, enum values and checked attributes in
//! place.

mod attrs;
mod decl;
mod group;
mod value;

pub use attrs::{
    Argument, AttrId, AttributeSet, CheckedAttribute, UncheckedAttribute, format_attr,
};
pub use decl::{
    DeclKind, DeclNode, DeclTag, DeclarationImportDecl, DeclarationRefDecl, EnumDecl,
    EnumItemDecl, FieldDecl, FuncDecl, IfaceDecl, IfaceParentDecl, ImplicitType,
    PackageDecl, PackageImportDecl, PackageRefDecl, ParamDecl, Resolution, StructDecl,
    TypeRefDecl, TypeRefKind, UnionDecl,
};
pub use group::PackageGroup;
pub use value::ConstValue;

pub use crate::base::DeclId;
