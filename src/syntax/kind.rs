use std::fmt;

/// Kinds of parse-tree nodes, named after the grammar rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Spec,
    UsePackage,
    UseSymbol,
    Struct,
    Enum,
    Union,
    Interface,
    GlobalFunction,
    Attr,
    ShortType,
    LongType,
    GenericType,
    CallbackType,
    BoolExpr,
    IntExpr,
    FloatExpr,
    StringExpr,
}

impl SyntaxKind {
    pub fn name(&self) -> &'static str {
        match self {
            SyntaxKind::Spec => "Spec",
            SyntaxKind::UsePackage => "UsePackage",
            SyntaxKind::UseSymbol => "UseSymbol",
            SyntaxKind::Struct => "Struct",
            SyntaxKind::Enum => "Enum",
            SyntaxKind::Union => "Union",
            SyntaxKind::Interface => "Interface",
            SyntaxKind::GlobalFunction => "GlobalFunction",
            SyntaxKind::Attr => "Attr",
            SyntaxKind::ShortType => "ShortType",
            SyntaxKind::LongType => "LongType",
            SyntaxKind::GenericType => "GenericType",
            SyntaxKind::CallbackType => "CallbackType",
            SyntaxKind::BoolExpr => "BoolExpr",
            SyntaxKind::IntExpr => "IntExpr",
            SyntaxKind::FloatExpr => "FloatExpr",
            SyntaxKind::StringExpr => "StringExpr",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
