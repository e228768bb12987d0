//! Constant expressions.
//!
//! The grammar keeps four disjoint expression languages. Mixing them (for
//! example adding a string to an int) is a parse error, so the tree never
//! has to represent it.

use super::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(BoolExpr),
    Int(IntExpr),
    Float(FloatExpr),
    Str(StrExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoolExpr {
    /// `true` or `false`.
    Literal(Token),
    /// `!expr`
    Not(Box<BoolExpr>),
    /// `&&`, `||`
    Binary {
        op: Token,
        left: Box<BoolExpr>,
        right: Box<BoolExpr>,
    },
    /// `<`, `>`, `<=`, `>=`, `==`, `!=` over ints.
    IntComparison {
        op: Token,
        left: Box<IntExpr>,
        right: Box<IntExpr>,
    },
    /// The same comparisons over floats.
    FloatComparison {
        op: Token,
        left: Box<FloatExpr>,
        right: Box<FloatExpr>,
    },
    Paren(Box<BoolExpr>),
    Conditional {
        cond: Box<BoolExpr>,
        then_expr: Box<BoolExpr>,
        else_expr: Box<BoolExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntExpr {
    /// Decimal, or `0b`/`0o`/`0x` prefixed.
    Literal(Token),
    /// `-`, `+`, `~`
    Unary { op: Token, expr: Box<IntExpr> },
    /// `+ - * / % << >> & | ^`
    Binary {
        op: Token,
        left: Box<IntExpr>,
        right: Box<IntExpr>,
    },
    Paren(Box<IntExpr>),
    Conditional {
        cond: Box<BoolExpr>,
        then_expr: Box<IntExpr>,
        else_expr: Box<IntExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FloatExpr {
    Literal(Token),
    /// `-`, `+`
    Unary { op: Token, expr: Box<FloatExpr> },
    /// `+ - * /`
    Binary {
        op: Token,
        left: Box<FloatExpr>,
        right: Box<FloatExpr>,
    },
    Paren(Box<FloatExpr>),
    Conditional {
        cond: Box<BoolExpr>,
        then_expr: Box<FloatExpr>,
        else_expr: Box<FloatExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrExpr {
    /// A quoted literal including its quotes; escapes are decoded.
    Literal(Token),
    /// A triple-quoted doc string; kept verbatim.
    DocString(Token),
    /// Concatenation.
    Concat {
        left: Box<StrExpr>,
        right: Box<StrExpr>,
    },
    Paren(Box<StrExpr>),
    Conditional {
        cond: Box<BoolExpr>,
        then_expr: Box<StrExpr>,
        else_expr: Box<StrExpr>,
    },
}

// ============================================================================
// BUILDERS
// ============================================================================

impl Expr {
    pub fn bool(value: bool) -> Self {
        Expr::Bool(BoolExpr::Literal(Token::new(if value { "true" } else { "false" })))
    }

    pub fn int(text: &str) -> Self {
        Expr::Int(IntExpr::Literal(Token::new(text)))
    }

    pub fn float(text: &str) -> Self {
        Expr::Float(FloatExpr::Literal(Token::new(text)))
    }

    /// A plain string literal; `value` is wrapped in double quotes.
    pub fn str(value: &str) -> Self {
        Expr::Str(StrExpr::Literal(Token::new(format!("\"{value}\""))))
    }

    pub fn doc(value: &str) -> Self {
        Expr::Str(StrExpr::DocString(Token::new(format!("\"\"\"{value}\"\"\""))))
    }
}

impl IntExpr {
    pub fn lit(text: &str) -> Self {
        IntExpr::Literal(Token::new(text))
    }

    pub fn unary(op: &str, expr: IntExpr) -> Self {
        IntExpr::Unary {
            op: Token::new(op),
            expr: Box::new(expr),
        }
    }

    pub fn binary(op: &str, left: IntExpr, right: IntExpr) -> Self {
        IntExpr::Binary {
            op: Token::new(op),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl FloatExpr {
    pub fn lit(text: &str) -> Self {
        FloatExpr::Literal(Token::new(text))
    }

    pub fn binary(op: &str, left: FloatExpr, right: FloatExpr) -> Self {
        FloatExpr::Binary {
            op: Token::new(op),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl BoolExpr {
    pub fn lit(value: bool) -> Self {
        BoolExpr::Literal(Token::new(if value { "true" } else { "false" }))
    }
}
