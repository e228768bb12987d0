//! Foundation types for the Taihe semantic layer.
//!
//! - [`Position`], [`Span`] - line/column ranges reported by the parser
//! - [`SourceLocation`] - a file plus an optional span
//! - [`DeclId`] - handle into the declaration arena
//!
//! This module has NO dependencies on other modules of the crate.

mod id;
mod location;
mod position;

pub use id::DeclId;
pub use location::{SourceLocation, UNKNOWN_LOCATION, display_location};
pub use position::{Position, Span};
