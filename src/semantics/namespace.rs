//! Declarations may not shadow a namespace implied by a package name.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::DeclId;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsManager};
use crate::ir::PackageGroup;

/// Every namespace implied by the packages of `pg`, mapped to the packages
/// that imply it. Package `a.b.c` implies `a.b.c`, `a.b` and `a`.
pub fn implied_namespaces(pg: &PackageGroup) -> IndexMap<SmolStr, Vec<DeclId>> {
    let mut namespaces: IndexMap<SmolStr, Vec<DeclId>> = IndexMap::new();
    for pkg in pg.packages() {
        let Some(decl) = pg.package(pkg) else {
            continue;
        };
        let mut name = decl.name.as_str();
        loop {
            namespaces.entry(name.into()).or_default().push(pkg);
            match name.rsplit_once('.') {
                Some((prefix, _)) => name = prefix,
                None => break,
            }
        }
    }
    namespaces
}

pub fn check_namespace_conflicts(pg: &PackageGroup, dm: &mut DiagnosticsManager) {
    let namespaces = implied_namespaces(pg);
    for pkg in pg.packages() {
        let Some(package) = pg.package(pkg) else {
            continue;
        };
        for (name, &decl) in &package.decls {
            let full = format!("{}.{}", package.name, name);
            let Some(implying) = namespaces.get(full.as_str()) else {
                continue;
            };
            let mut diag = Diagnostic::new(
                DiagnosticKind::SymbolConflictWithNamespace {
                    decl: pg.description(decl),
                    name: full.as_str().into(),
                },
                pg.node(decl).loc.clone(),
            );
            for &other in implying {
                diag = diag.with_note(
                    pg.node(other).loc.clone(),
                    format!("namespace '{full}' is implied by {}", pg.description(other)),
                );
            }
            dm.emit(diag);
        }
    }
}
