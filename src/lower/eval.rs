//! Constant expression evaluation.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::Span;
use crate::ir::ConstValue;
use crate::syntax::{BoolExpr, Expr, FloatExpr, IntExpr, StrExpr, Token};

/// A constant expression that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct EvalError {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalError {
    fn at(token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: token.span,
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

type IntBinaryOp = fn(i128, i128) -> Option<i128>;
type FloatBinaryOp = fn(f64, f64) -> f64;

// ============================================================================
// OPERATOR TABLES
// ============================================================================

fn int_binary_op(op: &str) -> Option<IntBinaryOp> {
    let f: IntBinaryOp = match op {
        "+" => i128::checked_add,
        "-" => i128::checked_sub,
        "*" => i128::checked_mul,
        "/" => int_div,
        "%" => int_mod,
        "<<" => int_shl,
        ">>" => int_shr,
        "&" => |a, b| Some(a & b),
        "|" => |a, b| Some(a | b),
        "^" => |a, b| Some(a ^ b),
        _ => return None,
    };
    Some(f)
}

fn int_unary_op(op: &str) -> Option<fn(i128) -> Option<i128>> {
    match op {
        "-" => Some(i128::checked_neg),
        "+" => Some(Some),
        "~" => Some(|a| Some(!a)),
        _ => None,
    }
}

fn float_binary_op(op: &str) -> Option<FloatBinaryOp> {
    let f: FloatBinaryOp = match op {
        "+" => |a, b| a + b,
        "-" => |a, b| a - b,
        "*" => |a, b| a * b,
        "/" => float_div,
        _ => return None,
    };
    Some(f)
}

fn compare<T: PartialOrd>(op: &str, a: T, b: T) -> Option<bool> {
    Some(match op {
        ">" => a > b,
        "<" => a < b,
        ">=" => a >= b,
        "<=" => a <= b,
        "==" => a == b,
        "!=" => a != b,
        _ => return None,
    })
}

fn bool_binary_op(op: &str) -> Option<fn(bool, bool) -> bool> {
    match op {
        "&&" => Some(|a, b| a && b),
        "||" => Some(|a, b| a || b),
        _ => None,
    }
}

/// Floor division; division by zero yields zero.
fn int_div(a: i128, b: i128) -> Option<i128> {
    if b == 0 {
        return Some(0);
    }
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

/// Remainder with the sign of the divisor; modulo zero yields zero.
fn int_mod(a: i128, b: i128) -> Option<i128> {
    if b == 0 {
        return Some(0);
    }
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        Some(r + b)
    } else {
        Some(r)
    }
}

fn int_shl(a: i128, b: i128) -> Option<i128> {
    let shift = u32::try_from(b).ok().filter(|s| *s < 128)?;
    let shifted = a.checked_shl(shift)?;
    (shifted >> shift == a).then_some(shifted)
}

fn int_shr(a: i128, b: i128) -> Option<i128> {
    let shift = u32::try_from(b).ok()?;
    Some(a >> shift.min(127))
}

fn float_div(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::NAN } else { a / b }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Evaluate any constant expression.
pub fn eval(expr: &Expr) -> EvalResult<ConstValue> {
    match expr {
        Expr::Bool(e) => eval_bool(e).map(ConstValue::Bool),
        Expr::Int(e) => eval_int(e).map(ConstValue::Int),
        Expr::Float(e) => eval_float(e).map(ConstValue::Float),
        Expr::Str(e) => eval_str(e).map(|s| ConstValue::Str(SmolStr::new(s))),
    }
}

pub fn eval_bool(expr: &BoolExpr) -> EvalResult<bool> {
    match expr {
        BoolExpr::Literal(token) => match token.text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(EvalError::at(token, format!("invalid bool literal '{other}'"))),
        },
        BoolExpr::Not(inner) => Ok(!eval_bool(inner)?),
        BoolExpr::Binary { op, left, right } => {
            let f = bool_binary_op(&op.text).ok_or_else(|| unknown_operator(op))?;
            Ok(f(eval_bool(left)?, eval_bool(right)?))
        }
        BoolExpr::IntComparison { op, left, right } => {
            compare(&op.text, eval_int(left)?, eval_int(right)?).ok_or_else(|| unknown_operator(op))
        }
        BoolExpr::FloatComparison { op, left, right } => {
            compare(&op.text, eval_float(left)?, eval_float(right)?)
                .ok_or_else(|| unknown_operator(op))
        }
        BoolExpr::Paren(inner) => eval_bool(inner),
        BoolExpr::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            if eval_bool(cond)? {
                eval_bool(then_expr)
            } else {
                eval_bool(else_expr)
            }
        }
    }
}

pub fn eval_int(expr: &IntExpr) -> EvalResult<i128> {
    match expr {
        IntExpr::Literal(token) => parse_int_literal(&token.text)
            .ok_or_else(|| EvalError::at(token, format!("invalid integer literal '{}'", token.text))),
        IntExpr::Unary { op, expr } => {
            let f = int_unary_op(&op.text).ok_or_else(|| unknown_operator(op))?;
            f(eval_int(expr)?).ok_or_else(|| overflow(op))
        }
        IntExpr::Binary { op, left, right } => {
            let f = int_binary_op(&op.text).ok_or_else(|| unknown_operator(op))?;
            f(eval_int(left)?, eval_int(right)?).ok_or_else(|| overflow(op))
        }
        IntExpr::Paren(inner) => eval_int(inner),
        IntExpr::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            if eval_bool(cond)? {
                eval_int(then_expr)
            } else {
                eval_int(else_expr)
            }
        }
    }
}

pub fn eval_float(expr: &FloatExpr) -> EvalResult<f64> {
    match expr {
        FloatExpr::Literal(token) => token
            .text
            .replace('_', "")
            .parse::<f64>()
            .map_err(|_| EvalError::at(token, format!("invalid float literal '{}'", token.text))),
        FloatExpr::Unary { op, expr } => {
            let value = eval_float(expr)?;
            match op.text.as_str() {
                "-" => Ok(-value),
                "+" => Ok(value),
                _ => Err(unknown_operator(op)),
            }
        }
        FloatExpr::Binary { op, left, right } => {
            let f = float_binary_op(&op.text).ok_or_else(|| unknown_operator(op))?;
            Ok(f(eval_float(left)?, eval_float(right)?))
        }
        FloatExpr::Paren(inner) => eval_float(inner),
        FloatExpr::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            if eval_bool(cond)? {
                eval_float(then_expr)
            } else {
                eval_float(else_expr)
            }
        }
    }
}

pub fn eval_str(expr: &StrExpr) -> EvalResult<String> {
    match expr {
        StrExpr::Literal(token) => {
            let body = strip_quotes(&token.text, 1)
                .ok_or_else(|| EvalError::at(token, "unterminated string literal"))?;
            unescape(body).map_err(|message| EvalError::at(token, message))
        }
        StrExpr::DocString(token) => strip_quotes(&token.text, 3)
            .map(str::to_string)
            .ok_or_else(|| EvalError::at(token, "unterminated doc string")),
        StrExpr::Concat { left, right } => Ok(eval_str(left)? + &eval_str(right)?),
        StrExpr::Paren(inner) => eval_str(inner),
        StrExpr::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            if eval_bool(cond)? {
                eval_str(then_expr)
            } else {
                eval_str(else_expr)
            }
        }
    }
}

fn unknown_operator(op: &Token) -> EvalError {
    EvalError::at(op, format!("unknown operator '{}'", op.text))
}

fn overflow(op: &Token) -> EvalError {
    EvalError::at(op, format!("integer overflow in '{}'", op.text))
}

// ============================================================================
// LITERALS
// ============================================================================

/// Parse a decimal or `0b`/`0o`/`0x` prefixed integer.
pub fn parse_int_literal(text: &str) -> Option<i128> {
    let text = text.replace('_', "");
    let (digits, radix) = if let Some(rest) = text.strip_prefix("0b") {
        (rest, 2)
    } else if let Some(rest) = text.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = text.strip_prefix("0x") {
        (rest, 16)
    } else {
        (text.as_str(), 10)
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    i128::from_str_radix(digits, radix).ok()
}

/// Remove `n` matching quote characters from both ends.
fn strip_quotes(text: &str, n: usize) -> Option<&str> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let delim = quote.to_string().repeat(n);
    text.strip_prefix(delim.as_str())?.strip_suffix(delim.as_str())
}

/// Decode backslash escapes. Unknown escapes are kept as written.
pub fn unescape(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            return Err("trailing backslash in string literal".to_string());
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{7}'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{b}'),
            '0'..='7' => {
                let mut code = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).ok_or("invalid octal escape")?);
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let hex: String = (0..width).filter_map(|_| chars.next()).collect();
                if hex.chars().count() != width {
                    return Err(format!("truncated \\{next} escape"));
                }
                if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(format!("invalid \\{next} escape"));
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("invalid \\{next} escape"))?;
                out.push(char::from_u32(code).ok_or_else(|| format!("invalid \\{next} escape"))?);
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Ok(out)
}
