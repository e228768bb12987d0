//! The parse-tree contract.
//!
//! The parser lives outside this crate. It hands over a [`Spec`] per source
//! file; nothing in here knows about grammar or tokens beyond their text
//! and span. The builder methods exist so tests (and other front ends) can
//! assemble trees directly.

mod ast;
mod expr;
mod kind;
mod token;

pub use ast::{
    Attr, AttrArg, Decl, DeclAliasPair, Enum, EnumProperty, GlobalFunction, Interface,
    InterfaceExtend, InterfaceFunction, Node, Parameter, Spec, Struct, StructProperty, TypeExpr,
    TypeExprKind, Union, UnionProperty, Use, UsePackage, UseSymbol,
};
pub use expr::{BoolExpr, Expr, FloatExpr, IntExpr, StrExpr};
pub use kind::SyntaxKind;
pub use token::{PkgName, Token};
