//! Shape checks on aggregate declarations.

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsManager};
use crate::ir::{DeclKind, PackageGroup};

/// Structs and unions need at least one field.
pub fn check_not_empty(pg: &PackageGroup, dm: &mut DiagnosticsManager) {
    for decl in pg.all_decls() {
        let empty = match pg.kind(decl) {
            DeclKind::Struct(st) => st.fields.is_empty(),
            DeclKind::Union(un) => un.fields.is_empty(),
            _ => false,
        };
        if empty {
            dm.emit(Diagnostic::new(
                DiagnosticKind::EmptyStructOrUnion {
                    decl: pg.description(decl),
                },
                pg.node(decl).loc.clone(),
            ));
        }
    }
}
