//! Builtin type and generic constructor tables.

use std::rc::Rc;

use super::{ScalarKind, Type, TypeKind};
use crate::base::DeclId;

/// Names that resolve to builtin types without any lookup.
pub const BUILTIN_TYPE_NAMES: [&str; 15] = [
    "void", "unit", "bool", "f32", "f64", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64",
    "String", "Opaque",
];

/// Construct the builtin type named `name`, or `None` if it is not builtin.
pub fn builtin_type(name: &str, origin: DeclId) -> Option<Type> {
    let kind = match name {
        "void" => TypeKind::Void,
        "unit" => TypeKind::Unit,
        "String" => TypeKind::String,
        "Opaque" => TypeKind::Opaque,
        other => TypeKind::Scalar(ScalarKind::from_symbol(other)?),
    };
    Some(Type::new(origin, kind))
}

/// The builtin generic constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericKind {
    Array,
    Optional,
    Vector,
    Map,
    Set,
}

/// Why a generic could not be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericError {
    Arity { expected: usize, got: usize },
    /// The argument at this position is `void`.
    VoidArgument(usize),
}

impl GenericKind {
    pub fn from_name(name: &str) -> Option<GenericKind> {
        match name {
            "Array" => Some(GenericKind::Array),
            "Optional" => Some(GenericKind::Optional),
            "Vector" => Some(GenericKind::Vector),
            "Map" => Some(GenericKind::Map),
            "Set" => Some(GenericKind::Set),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GenericKind::Array => "Array",
            GenericKind::Optional => "Optional",
            GenericKind::Vector => "Vector",
            GenericKind::Map => "Map",
            GenericKind::Set => "Set",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            GenericKind::Map => 2,
            _ => 1,
        }
    }

    /// Check arity and argument kinds, then build the type.
    pub fn construct(&self, origin: DeclId, args: &[Rc<Type>]) -> Result<Type, GenericError> {
        if args.len() != self.arity() {
            return Err(GenericError::Arity {
                expected: self.arity(),
                got: args.len(),
            });
        }
        if let Some(index) = args.iter().position(|arg| arg.is_void()) {
            return Err(GenericError::VoidArgument(index));
        }
        let first = Rc::clone(&args[0]);
        let kind = match self {
            GenericKind::Array => TypeKind::Array(first),
            GenericKind::Optional => TypeKind::Optional(first),
            GenericKind::Vector => TypeKind::Vector(first),
            GenericKind::Map => TypeKind::Map(first, Rc::clone(&args[1])),
            GenericKind::Set => TypeKind::Set(first),
        };
        Ok(Type::new(origin, kind))
    }
}
