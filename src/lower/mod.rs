//! Lowering of parse trees into the declaration graph.
//!
//! [`convert`] turns one [`Spec`](crate::syntax::Spec) into a package and
//! registers it in a [`PackageGroup`](crate::ir::PackageGroup). Constant
//! expressions in enum values and attribute arguments are evaluated here by
//! the [`eval`] module.

mod convert;
pub mod eval;

pub use convert::{AstConverter, SourceInfo, convert, is_valid_package_name};
pub use eval::{EvalError, parse_int_literal, unescape};
