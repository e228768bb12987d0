//! End-to-end runs of the compiler driver.

pub mod tests_pipeline;
