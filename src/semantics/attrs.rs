//! Attribute conversion and context checking over the whole group.

use tracing::debug;

use crate::attributes::AttributeRegistry;
use crate::diagnostics::DiagnosticsManager;
use crate::ir::PackageGroup;

/// Validate the unchecked attributes of every declaration and attach the
/// resulting checked attributes.
pub fn convert_attributes(
    pg: &mut PackageGroup,
    registry: &AttributeRegistry,
    dm: &mut DiagnosticsManager,
) {
    let decls = pg.postorder();
    for &decl in &decls {
        registry.convert(pg, decl, dm);
    }
    debug!(decls = decls.len(), "converted attributes");
}

/// Check every checked attribute against its declaration and siblings.
/// Must run after [`convert_attributes`] has finished for all declarations.
pub fn check_attributes(pg: &PackageGroup, registry: &AttributeRegistry, dm: &mut DiagnosticsManager) {
    for decl in pg.postorder() {
        if !pg.node(decl).attrs.is_empty() {
            registry.check_context(pg, decl, dm);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::register_standard;
    use crate::ir::DeclKind;
    use crate::lower::{SourceInfo, convert};
    use crate::semantics::resolve;
    use crate::syntax::{Attr, Expr, GlobalFunction, Parameter, Spec, Struct, TypeExpr};

    #[test]
    fn test_conversion_drains_unchecked_attributes() {
        let mut registry = AttributeRegistry::new();
        register_standard(&mut registry).unwrap();
        let spec = Spec::new()
            .with_inner_attr(Attr::new("namespace").arg(Expr::str("ns")))
            .with_decl(
                Struct::new("S")
                    .field("x", TypeExpr::short("i32"))
                    .with_attr(Attr::new("const")),
            )
            .with_decl(GlobalFunction::new(
                "f",
                vec![Parameter::new("p", TypeExpr::short("i32")).with_attr(Attr::new("nope"))],
                None,
            ));
        let mut pg = PackageGroup::new();
        let mut dm = DiagnosticsManager::new();
        let source = SourceInfo {
            file: "p.taihe".into(),
            pkg_name: "p".into(),
            is_stdlib: false,
        };
        let pkg = convert(&spec, &source, &mut pg, &mut dm).unwrap();
        resolve(&mut pg, &mut dm);
        convert_attributes(&mut pg, &registry, &mut dm);

        for decl in pg.postorder() {
            assert!(pg.node(decl).attrs.unchecked.is_empty());
        }
        assert_eq!(
            registry
                .get_single(&pg, pkg, "namespace")
                .and_then(|attr| attr.get_str("module")),
            Some("ns")
        );
        assert_eq!(dm.error_count(), 1);
        assert!(dm.diagnostics()[0].message().starts_with("Unknown attribute: 'nope'"));

        check_attributes(&pg, &registry, &mut dm);
        // `const` only applies to enums.
        assert_eq!(dm.error_count(), 2);
        let st = pg.lookup_decl(pkg, "S").unwrap();
        assert!(matches!(pg.kind(st), DeclKind::Struct(_)));
        assert!(dm.diagnostics()[1].message().ends_with("cannot be attached to struct S"));
    }
}
