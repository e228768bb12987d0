//! Checks on declaration shape: enums, aggregates, cycles, namespaces.

pub mod tests_cycles;
pub mod tests_enums;
pub mod tests_namespaces;
pub mod tests_packages;
