//! Declarative attribute validation.
//!
//! Attributes arrive from the parser as [`UncheckedAttribute`]s: a name and
//! a list of evaluated, optionally keyed arguments. An [`AttrSchema`]
//! describes what a known attribute accepts; the [`AttributeRegistry`]
//! looks schemas up by name, maps arguments onto fields and later checks
//! each attached attribute against its declaration.
//!
//! ```text
//! UncheckedAttribute ──construct──▶ CheckedAttribute ──check_context──▶ ok / diagnostics
//!          ▲                              │
//!     AttrSchema (fields, targets,        └── AttributeSet::attach
//!     groups, repeatable, check)
//! ```
//!
//! [`UncheckedAttribute`]: crate::ir::UncheckedAttribute

mod construct;
mod registry;
mod schema;
pub mod standard;
mod suggest;

pub use construct::construct;
pub use registry::{AttributeRegistry, RegistryError};
pub use schema::{
    AttrGroup, AttrSchema, ContextCheck, DeclTarget, FieldSpec, Presence, ValueType,
};
pub use standard::{register_standard, standard_attributes};
pub use suggest::{close_matches, similarity};
