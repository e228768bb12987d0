//! Declarations and type expressions of a parsed `.taihe` file.

use crate::base::Span;

use super::{Expr, PkgName, SyntaxKind, Token};

/// Every parse-tree node reports its kind.
pub trait Node {
    fn kind(&self) -> SyntaxKind;
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// `@name(args)` before a declaration or `@!name(args)` inside one.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub name: Token,
    pub args: Vec<AttrArg>,
}

/// One argument of an attribute call, optionally `key = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrArg {
    pub key: Option<Token>,
    pub val: Expr,
    pub span: Option<Span>,
}

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub attrs: Vec<Attr>,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    /// `Name`
    Short { name: Token },
    /// `pkg.path.Name`
    Long { pkg_name: PkgName, name: Token },
    /// `Name<args>`
    Generic { name: Token, args: Vec<TypeExpr> },
    /// `(params) => ret`
    Callback {
        params: Vec<Parameter>,
        ret: Option<Box<TypeExpr>>,
    },
}

// ============================================================================
// USES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Use {
    /// `use pkg.name;` or `use pkg.name as alias;`
    Package(UsePackage),
    /// `from pkg.name use A, B as C;`
    Symbol(UseSymbol),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsePackage {
    pub pkg_name: PkgName,
    pub alias: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseSymbol {
    pub pkg_name: PkgName,
    pub pairs: Vec<DeclAliasPair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclAliasPair {
    pub name: Token,
    pub alias: Option<Token>,
}

// ============================================================================
// DECLARATIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Struct(Struct),
    Enum(Enum),
    Union(Union),
    Interface(Interface),
    Function(GlobalFunction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Token,
    pub ty: TypeExpr,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructProperty {
    pub name: Token,
    pub ty: TypeExpr,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: Token,
    pub fields: Vec<StructProperty>,
    pub attrs: Vec<Attr>,
    pub inner_attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumProperty {
    pub name: Token,
    pub val: Option<Expr>,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: Token,
    pub ty: TypeExpr,
    pub items: Vec<EnumProperty>,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionProperty {
    pub name: Token,
    /// Omitted for unit-typed alternatives.
    pub ty: Option<TypeExpr>,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub name: Token,
    pub fields: Vec<UnionProperty>,
    pub attrs: Vec<Attr>,
    pub inner_attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceFunction {
    pub name: Token,
    pub params: Vec<Parameter>,
    pub ret: Option<TypeExpr>,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceExtend {
    pub ty: TypeExpr,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: Token,
    pub methods: Vec<InterfaceFunction>,
    pub extends: Vec<InterfaceExtend>,
    pub attrs: Vec<Attr>,
    pub inner_attrs: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalFunction {
    pub name: Token,
    pub params: Vec<Parameter>,
    pub ret: Option<TypeExpr>,
    pub attrs: Vec<Attr>,
}

/// The root of one source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spec {
    pub uses: Vec<Use>,
    pub decls: Vec<Decl>,
    pub inner_attrs: Vec<Attr>,
}

// ============================================================================
// NODE KINDS
// ============================================================================

impl Node for TypeExpr {
    fn kind(&self) -> SyntaxKind {
        match self.kind {
            TypeExprKind::Short { .. } => SyntaxKind::ShortType,
            TypeExprKind::Long { .. } => SyntaxKind::LongType,
            TypeExprKind::Generic { .. } => SyntaxKind::GenericType,
            TypeExprKind::Callback { .. } => SyntaxKind::CallbackType,
        }
    }
}

impl Node for Use {
    fn kind(&self) -> SyntaxKind {
        match self {
            Use::Package(_) => SyntaxKind::UsePackage,
            Use::Symbol(_) => SyntaxKind::UseSymbol,
        }
    }
}

impl Node for Decl {
    fn kind(&self) -> SyntaxKind {
        match self {
            Decl::Struct(_) => SyntaxKind::Struct,
            Decl::Enum(_) => SyntaxKind::Enum,
            Decl::Union(_) => SyntaxKind::Union,
            Decl::Interface(_) => SyntaxKind::Interface,
            Decl::Function(_) => SyntaxKind::GlobalFunction,
        }
    }
}

impl Node for Spec {
    fn kind(&self) -> SyntaxKind {
        SyntaxKind::Spec
    }
}

impl Node for Attr {
    fn kind(&self) -> SyntaxKind {
        SyntaxKind::Attr
    }
}

impl Node for Expr {
    fn kind(&self) -> SyntaxKind {
        match self {
            Expr::Bool(_) => SyntaxKind::BoolExpr,
            Expr::Int(_) => SyntaxKind::IntExpr,
            Expr::Float(_) => SyntaxKind::FloatExpr,
            Expr::Str(_) => SyntaxKind::StringExpr,
        }
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

impl Attr {
    pub fn new(name: impl Into<Token>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, val: Expr) -> Self {
        self.args.push(AttrArg {
            key: None,
            val,
            span: None,
        });
        self
    }

    /// Append a keyword argument.
    pub fn kwarg(mut self, key: &str, val: Expr) -> Self {
        self.args.push(AttrArg {
            key: Some(Token::new(key)),
            val,
            span: None,
        });
        self
    }
}

impl TypeExpr {
    fn from_kind(kind: TypeExprKind) -> Self {
        Self {
            kind,
            attrs: Vec::new(),
            span: None,
        }
    }

    pub fn short(name: &str) -> Self {
        Self::from_kind(TypeExprKind::Short {
            name: Token::new(name),
        })
    }

    pub fn long(pkg_name: &str, name: &str) -> Self {
        Self::from_kind(TypeExprKind::Long {
            pkg_name: PkgName::new(pkg_name),
            name: Token::new(name),
        })
    }

    pub fn generic(name: &str, args: Vec<TypeExpr>) -> Self {
        Self::from_kind(TypeExprKind::Generic {
            name: Token::new(name),
            args,
        })
    }

    pub fn callback(params: Vec<Parameter>, ret: Option<TypeExpr>) -> Self {
        Self::from_kind(TypeExprKind::Callback {
            params,
            ret: ret.map(Box::new),
        })
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.span = Some(Span::point(line, column));
        self
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }
}

impl Parameter {
    pub fn new(name: impl Into<Token>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }
}

impl Use {
    pub fn package(pkg_name: &str, alias: Option<&str>) -> Self {
        Use::Package(UsePackage {
            pkg_name: PkgName::new(pkg_name),
            alias: alias.map(Token::new),
        })
    }

    /// `from pkg_name use name [as alias], ...`
    pub fn symbols(pkg_name: &str, pairs: &[(&str, Option<&str>)]) -> Self {
        Use::Symbol(UseSymbol {
            pkg_name: PkgName::new(pkg_name),
            pairs: pairs
                .iter()
                .map(|(name, alias)| DeclAliasPair {
                    name: Token::new(*name),
                    alias: alias.map(Token::new),
                })
                .collect(),
        })
    }
}

impl Struct {
    pub fn new(name: impl Into<Token>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            attrs: Vec::new(),
            inner_attrs: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<Token>, ty: TypeExpr) -> Self {
        self.fields.push(StructProperty {
            name: name.into(),
            ty,
            attrs: Vec::new(),
        });
        self
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }
}

impl Enum {
    pub fn new(name: impl Into<Token>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            items: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn item(mut self, name: impl Into<Token>, val: Option<Expr>) -> Self {
        self.items.push(EnumProperty {
            name: name.into(),
            val,
            attrs: Vec::new(),
        });
        self
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }
}

impl Union {
    pub fn new(name: impl Into<Token>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            attrs: Vec::new(),
            inner_attrs: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<Token>, ty: Option<TypeExpr>) -> Self {
        self.fields.push(UnionProperty {
            name: name.into(),
            ty,
            attrs: Vec::new(),
        });
        self
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }
}

impl Interface {
    pub fn new(name: impl Into<Token>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            extends: Vec::new(),
            attrs: Vec::new(),
            inner_attrs: Vec::new(),
        }
    }

    pub fn extends(mut self, ty: TypeExpr) -> Self {
        self.extends.push(InterfaceExtend {
            ty,
            attrs: Vec::new(),
        });
        self
    }

    pub fn method(mut self, method: InterfaceFunction) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }
}

impl InterfaceFunction {
    pub fn new(name: impl Into<Token>, params: Vec<Parameter>, ret: Option<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }
}

impl GlobalFunction {
    pub fn new(name: impl Into<Token>, params: Vec<Parameter>, ret: Option<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }
}

impl Spec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_use(mut self, item: Use) -> Self {
        self.uses.push(item);
        self
    }

    pub fn with_decl(mut self, decl: impl Into<Decl>) -> Self {
        self.decls.push(decl.into());
        self
    }

    pub fn with_inner_attr(mut self, attr: Attr) -> Self {
        self.inner_attrs.push(attr);
        self
    }
}

impl From<Struct> for Decl {
    fn from(value: Struct) -> Self {
        Decl::Struct(value)
    }
}

impl From<Enum> for Decl {
    fn from(value: Enum) -> Self {
        Decl::Enum(value)
    }
}

impl From<Union> for Decl {
    fn from(value: Union) -> Self {
        Decl::Union(value)
    }
}

impl From<Interface> for Decl {
    fn from(value: Interface) -> Self {
        Decl::Interface(value)
    }
}

impl From<GlobalFunction> for Decl {
    fn from(value: GlobalFunction) -> Self {
        Decl::Function(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kinds() {
        assert_eq!(TypeExpr::short("i32").kind(), SyntaxKind::ShortType);
        assert_eq!(
            TypeExpr::generic("Array", vec![TypeExpr::short("i32")]).kind(),
            SyntaxKind::GenericType
        );
        assert_eq!(Decl::from(Struct::new("S")).kind(), SyntaxKind::Struct);
        assert_eq!(Use::package("a.b", None).kind(), SyntaxKind::UsePackage);
        assert_eq!(Expr::int("1").kind(), SyntaxKind::IntExpr);
    }

    #[test]
    fn test_attr_builder() {
        let attr = Attr::new("namespace")
            .arg(Expr::str("@ohos.util"))
            .kwarg("namespace", Expr::str("util"));
        assert_eq!(attr.args.len(), 2);
        assert!(attr.args[0].key.is_none());
        assert_eq!(attr.args[1].key.as_ref().map(|k| k.text.as_str()), Some("namespace"));
    }
}
