//! Running resolution again changes nothing and reports nothing new.

use std::rc::Rc;

use taihe_sema::ir::Resolution;
use taihe_sema::lower::{SourceInfo, convert};
use taihe_sema::semantics::resolve;
use taihe_sema::syntax::{Interface, InterfaceFunction, Parameter, Spec, TypeExpr, Use};
use taihe_sema::{DiagnosticsManager, PackageGroup};

use crate::helpers::*;

fn group() -> (PackageGroup, DiagnosticsManager) {
    let lib = Spec::new()
        .with_decl(plain_struct("Item"))
        .with_decl(Interface::new("Base"));
    let app = Spec::new()
        .with_use(Use::package("lib", None))
        .with_use(Use::symbols("lib", &[("Base", None), ("Nope", None)]))
        .with_decl(struct_of(
            "Holder",
            TypeExpr::generic("Array", vec![TypeExpr::long("lib", "Item")]),
        ))
        .with_decl(
            Interface::new("Child").extends(TypeExpr::short("Base")).method(
                InterfaceFunction::new(
                    "on",
                    vec![Parameter::new(
                        "cb",
                        TypeExpr::callback(
                            vec![Parameter::new("x", TypeExpr::short("Missing"))],
                            None,
                        ),
                    )],
                    Some(TypeExpr::short("bool")),
                ),
            ),
        );
    let mut pg = PackageGroup::new();
    let mut dm = DiagnosticsManager::new();
    for (name, spec) in [("lib", lib), ("app", app)] {
        let source = SourceInfo {
            file: format!("{name}.taihe").into(),
            pkg_name: name.into(),
            is_stdlib: false,
        };
        convert(&spec, &source, &mut pg, &mut dm).unwrap();
    }
    (pg, dm)
}

fn snapshot(pg: &PackageGroup) -> Vec<Option<Resolution<Rc<taihe_sema::types::Type>>>> {
    (0..pg.len())
        .map(taihe_sema::DeclId::new)
        .map(|id| pg.type_ref(id).and_then(|ty_ref| ty_ref.resolved.clone()))
        .collect()
}

#[test]
fn test_second_resolution_is_a_no_op() {
    let (mut pg, mut dm) = group();
    resolve(&mut pg, &mut dm);
    let reported = dm.diagnostics().len();
    // `Nope` and `Missing`.
    assert_eq!(reported, 2);
    let first = snapshot(&pg);

    resolve(&mut pg, &mut dm);
    assert_eq!(dm.diagnostics().len(), reported);
    let second = snapshot(&pg);
    assert_eq!(first.len(), second.len());
    for (before, after) in first.iter().zip(&second) {
        match (before, after) {
            (Some(Resolution::Resolved(a)), Some(Resolution::Resolved(b))) => {
                assert!(Rc::ptr_eq(a, b))
            }
            (a, b) => assert_eq!(a, b),
        }
    }
}

#[test]
fn test_every_type_ref_is_settled() {
    let (mut pg, mut dm) = group();
    resolve(&mut pg, &mut dm);
    for (id, state) in snapshot(&pg).into_iter().enumerate() {
        if pg.type_ref(taihe_sema::DeclId::new(id)).is_some() {
            assert!(state.is_some(), "type reference {id} left unresolved");
        }
    }
}
