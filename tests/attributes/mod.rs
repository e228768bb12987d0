//! Attribute argument validation and context checks.

pub mod tests_arguments;
pub mod tests_context;
