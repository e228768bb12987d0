//! Import and type reference resolution across packages.

pub mod tests_idempotent;
pub mod tests_types;
