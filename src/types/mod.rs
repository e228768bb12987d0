//! The Taihe type system.
//!
//! Types are immutable values shared through `Rc`. Every type records the
//! type reference that produced it (`origin`), but equality and the
//! canonical [`Type::signature`] depend on structure only.

mod builtin;
mod scalar;
mod ty;

pub use builtin::{BUILTIN_TYPE_NAMES, GenericError, GenericKind, builtin_type};
pub use scalar::ScalarKind;
pub use ty::{CallbackSig, Type, TypeKind, UserType};
