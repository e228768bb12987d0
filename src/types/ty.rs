//! The resolved type algebra.

use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::base::DeclId;

use super::ScalarKind;

/// A reference to a user-declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserType {
    /// The enum/struct/union/interface declaration.
    pub decl: DeclId,
    /// Fully qualified name, e.g. `pkg.ns.Name`.
    pub full_name: SmolStr,
}

/// The parameter list and return type of a callback.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackSig {
    pub params: Vec<(SmolStr, Rc<Type>)>,
    pub ret: Rc<Type>,
}

/// The structural part of a [`Type`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Void,
    Unit,
    Scalar(ScalarKind),
    String,
    Opaque,
    Callback(CallbackSig),
    Array(Rc<Type>),
    Optional(Rc<Type>),
    Vector(Rc<Type>),
    Map(Rc<Type>, Rc<Type>),
    Set(Rc<Type>),
    Enum(UserType),
    Struct(UserType),
    Union(UserType),
    Iface(UserType),
}

/// A resolved type.
///
/// `origin` is the type reference this value was produced for. It is only
/// used to locate diagnostics and does not take part in equality.
#[derive(Debug, Clone)]
pub struct Type {
    pub origin: DeclId,
    pub kind: TypeKind,
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Type {
    pub fn new(origin: DeclId, kind: TypeKind) -> Self {
        Self { origin, kind }
    }

    /// Canonical textual form of the type.
    pub fn signature(&self) -> String {
        match &self.kind {
            TypeKind::Void => "void".to_string(),
            TypeKind::Unit => "unit".to_string(),
            TypeKind::Scalar(kind) => kind.symbol().to_string(),
            TypeKind::String => "String".to_string(),
            TypeKind::Opaque => "Opaque".to_string(),
            TypeKind::Callback(sig) => {
                let params: Vec<String> = sig
                    .params
                    .iter()
                    .map(|(name, ty)| format!("{name}: {}", ty.signature()))
                    .collect();
                format!("({}) => {}", params.join(", "), sig.ret.signature())
            }
            TypeKind::Array(item) => format!("Array<{}>", item.signature()),
            TypeKind::Optional(item) => format!("Optional<{}>", item.signature()),
            TypeKind::Vector(item) => format!("Vector<{}>", item.signature()),
            TypeKind::Map(key, val) => {
                format!("Map<{}, {}>", key.signature(), val.signature())
            }
            TypeKind::Set(key) => format!("Set<{}>", key.signature()),
            TypeKind::Enum(user)
            | TypeKind::Struct(user)
            | TypeKind::Union(user)
            | TypeKind::Iface(user) => user.full_name.to_string(),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self.kind, TypeKind::Unit)
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, TypeKind::String)
    }

    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self.kind {
            TypeKind::Scalar(kind) => Some(kind),
            _ => None,
        }
    }

    /// The declaration behind a user-defined type.
    pub fn as_user(&self) -> Option<&UserType> {
        match &self.kind {
            TypeKind::Enum(user)
            | TypeKind::Struct(user)
            | TypeKind::Union(user)
            | TypeKind::Iface(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_iface(&self) -> Option<&UserType> {
        match &self.kind {
            TypeKind::Iface(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Array(_)
                | TypeKind::Optional(_)
                | TypeKind::Vector(_)
                | TypeKind::Map(..)
                | TypeKind::Set(_)
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}
