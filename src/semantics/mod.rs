//! Semantic analysis of a converted package group.
//!
//! [`analyze`] runs the passes in a fixed order. Each pass reports through
//! the [`DiagnosticsManager`] and never stops the pipeline:
//!
//! ```text
//! namespace conflicts → imports/types → enum domains → empty aggregates
//!     → inclusion cycles → attribute conversion → attribute context
//! ```

mod attrs;
mod cycles;
mod enums;
mod namespace;
mod resolve;
mod structure;

pub use attrs::{check_attributes, convert_attributes};
pub use cycles::{
    Graph, InclusionEdge, check_recursive_inclusion, detect_cycles, inclusion_graph,
};
pub use enums::{EnumDomain, check_enum, check_enums};
pub use namespace::{check_namespace_conflicts, implied_namespaces};
pub use resolve::{Resolver, TypeUsage, resolve};
pub use structure::check_not_empty;

use tracing::info;

use crate::attributes::AttributeRegistry;
use crate::diagnostics::DiagnosticsManager;
use crate::ir::PackageGroup;

/// Knobs for [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Run the attribute passes even when earlier passes reported errors.
    pub attributes_on_error: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            attributes_on_error: true,
        }
    }
}

/// Run every semantic pass over `pg`.
pub fn analyze(
    pg: &mut PackageGroup,
    registry: &AttributeRegistry,
    options: &AnalysisOptions,
    dm: &mut DiagnosticsManager,
) {
    let packages = pg.packages().count();

    check_namespace_conflicts(pg, dm);
    info!(packages, errors = dm.error_count(), "namespace check done");

    resolve(pg, dm);
    info!(errors = dm.error_count(), "resolution done");

    check_enums(pg, dm);
    check_not_empty(pg, dm);
    check_recursive_inclusion(pg, dm);
    info!(
        errors = dm.error_count(),
        warnings = dm.warning_count(),
        "declaration checks done"
    );

    if dm.has_error() && !options.attributes_on_error {
        info!("skipping attribute passes after errors");
        return;
    }
    convert_attributes(pg, registry, dm);
    check_attributes(pg, registry, dm);
    info!(
        errors = dm.error_count(),
        warnings = dm.warning_count(),
        "attribute checks done"
    );
}
