use rstest::rstest;
use taihe_sema::syntax::{GlobalFunction, Spec, TypeExpr, Use};

use crate::helpers::*;

// =============================================================================
// GENERICS
// =============================================================================

#[rstest]
#[case("Array", 1, true)]
#[case("Optional", 1, true)]
#[case("Vector", 1, true)]
#[case("Set", 1, true)]
#[case("Map", 2, true)]
#[case("Array", 0, false)]
#[case("Optional", 2, false)]
#[case("Set", 3, false)]
#[case("Map", 1, false)]
#[case("Map", 3, false)]
fn test_generic_arity(#[case] name: &str, #[case] arity: usize, #[case] valid: bool) {
    let args = (0..arity).map(|_| TypeExpr::short("i32")).collect();
    let ci = compile(vec![(
        "p",
        Spec::new().with_decl(struct_of("S", TypeExpr::generic(name, args))),
    )]);
    assert_eq!(first_field_type(&ci, "p", "S").is_some(), valid);
    if valid {
        assert_no_errors(&ci);
    } else {
        let errors = errors(&ci);
        assert_eq!(errors.len(), 1);
        assert!(
            errors[0].starts_with("Invalid generic arguments in"),
            "unexpected error: {}",
            errors[0]
        );
        assert!(errors[0].ends_with(&format!("got {arity}")));
    }
}

#[test]
fn test_nested_generics() {
    let ty = TypeExpr::generic(
        "Map",
        vec![
            TypeExpr::short("String"),
            TypeExpr::generic("Array", vec![TypeExpr::short("Point")]),
        ],
    );
    let ci = compile(vec![(
        "geo",
        Spec::new()
            .with_decl(plain_struct("Point"))
            .with_decl(struct_of("Index", ty)),
    )]);
    assert_no_errors(&ci);
    assert_eq!(
        first_field_type(&ci, "geo", "Index").as_deref(),
        Some("Map<String, Array<geo.Point>>")
    );
}

#[test]
fn test_unknown_generic_name() {
    let ci = compile(vec![(
        "p",
        Spec::new().with_decl(struct_of(
            "S",
            TypeExpr::generic("List", vec![TypeExpr::short("i32")]),
        )),
    )]);
    assert_eq!(
        errors(&ci),
        vec!["declaration name 'List' is not declared or imported in this scope"]
    );
}

// =============================================================================
// IMPORTS
// =============================================================================

fn library() -> Spec {
    Spec::new().with_decl(plain_struct("Item"))
}

#[rstest]
#[case(Use::package("lib", None), TypeExpr::long("lib", "Item"))]
#[case(Use::package("lib", Some("l")), TypeExpr::long("l", "Item"))]
#[case(Use::symbols("lib", &[("Item", None)]), TypeExpr::short("Item"))]
#[case(Use::symbols("lib", &[("Item", Some("Thing"))]), TypeExpr::short("Thing"))]
fn test_import_forms(#[case] import: Use, #[case] ty: TypeExpr) {
    let app = Spec::new()
        .with_use(import)
        .with_decl(struct_of("Holder", ty));
    let ci = compile(vec![("lib", library()), ("app", app)]);
    assert_no_errors(&ci);
    assert_eq!(
        first_field_type(&ci, "app", "Holder").as_deref(),
        Some("lib.Item")
    );
}

#[test]
fn test_import_order_does_not_matter() {
    let app = Spec::new()
        .with_use(Use::package("lib", None))
        .with_decl(struct_of("Holder", TypeExpr::long("lib", "Item")));
    let ci = compile(vec![("app", app), ("lib", library())]);
    assert_no_errors(&ci);
}

#[rstest]
#[case(
    Use::package("gone", None),
    TypeExpr::short("i32"),
    "package 'gone' not exist"
)]
#[case(
    Use::symbols("lib", &[("Missing", None)]),
    TypeExpr::short("i32"),
    "declaration 'Missing' not exist"
)]
#[case(
    Use::package("lib", None),
    TypeExpr::long("other", "Item"),
    "package name 'other' is not imported in this scope"
)]
#[case(
    Use::package("lib", None),
    TypeExpr::long("lib", "Missing"),
    "declaration 'Missing' not exist"
)]
#[case(
    Use::package("lib", None),
    TypeExpr::short("Item"),
    "declaration name 'Item' is not declared or imported in this scope"
)]
fn test_unresolvable_references(#[case] import: Use, #[case] ty: TypeExpr, #[case] message: &str) {
    let app = Spec::new()
        .with_use(import)
        .with_decl(struct_of("Holder", ty));
    let ci = compile(vec![("lib", library()), ("app", app)]);
    assert_eq!(errors(&ci), vec![message]);
}

#[test]
fn test_function_is_not_a_type() {
    let spec = Spec::new()
        .with_decl(GlobalFunction::new("make", vec![], None))
        .with_decl(struct_of("S", TypeExpr::short("make")));
    let ci = compile(vec![("p", spec)]);
    assert_eq!(errors(&ci), vec!["'make' is not a type name"]);
    assert_eq!(first_field_type(&ci, "p", "S"), None);
}
