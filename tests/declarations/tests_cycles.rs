use taihe_sema::syntax::{Interface, Spec, Struct, TypeExpr, Union};

use crate::helpers::*;

fn cycle_errors(spec: Spec) -> Vec<String> {
    let ci = compile(vec![("p", spec)]);
    errors(&ci)
        .into_iter()
        .filter(|m| m.starts_with("cycle detected"))
        .collect()
}

#[test]
fn test_struct_containing_itself() {
    let spec = Spec::new().with_decl(struct_of("Node", TypeExpr::short("Node")));
    assert_eq!(cycle_errors(spec), vec!["cycle detected in struct Node"]);
}

#[test]
fn test_cycle_through_union() {
    let spec = Spec::new()
        .with_decl(struct_of("A", TypeExpr::short("U")))
        .with_decl(Union::new("U").field("a", Some(TypeExpr::short("A"))));
    assert_eq!(cycle_errors(spec).len(), 1);
}

#[test]
fn test_containers_break_cycles() {
    let spec = Spec::new()
        .with_decl(
            Struct::new("Tree")
                .field("children", TypeExpr::generic("Array", vec![TypeExpr::short("Tree")]))
                .field("parent", TypeExpr::generic("Optional", vec![TypeExpr::short("Tree")])),
        )
        .with_decl(
            Union::new("Json")
                .field("null", None)
                .field("object", Some(TypeExpr::generic(
                    "Map",
                    vec![TypeExpr::short("String"), TypeExpr::short("Json")],
                ))),
        );
    let ci = compile(vec![("p", spec)]);
    assert_no_errors(&ci);
}

#[test]
fn test_interface_inheritance_cycle() {
    let spec = Spec::new()
        .with_decl(Interface::new("A").extends(TypeExpr::short("B")))
        .with_decl(Interface::new("B").extends(TypeExpr::short("C")))
        .with_decl(Interface::new("C").extends(TypeExpr::short("A")));
    assert_eq!(cycle_errors(spec).len(), 1);
}

#[test]
fn test_interface_diamond_is_not_a_cycle() {
    let spec = Spec::new()
        .with_decl(Interface::new("Root"))
        .with_decl(Interface::new("Left").extends(TypeExpr::short("Root")))
        .with_decl(Interface::new("Right").extends(TypeExpr::short("Root")))
        .with_decl(
            Interface::new("Bottom")
                .extends(TypeExpr::short("Left"))
                .extends(TypeExpr::short("Right")),
        );
    let ci = compile(vec![("p", spec)]);
    assert_no_errors(&ci);
    assert!(warnings(&ci).is_empty());
}

#[test]
fn test_duplicate_extends_is_only_a_warning() {
    let spec = Spec::new()
        .with_decl(Interface::new("Base"))
        .with_decl(
            Interface::new("Child")
                .extends(TypeExpr::short("Base"))
                .extends(TypeExpr::short("Base")),
        );
    let ci = compile(vec![("p", spec)]);
    assert_no_errors(&ci);
    assert_eq!(
        warnings(&ci),
        vec!["interface Base is extended multiple times by interface Child"]
    );
}

#[test]
fn test_empty_aggregates() {
    let spec = Spec::new()
        .with_decl(Struct::new("Empty"))
        .with_decl(Union::new("Nothing"));
    let ci = compile(vec![("p", spec)]);
    assert_eq!(
        errors(&ci),
        vec![
            "struct Empty cannot be empty, at least one field is required",
            "union Nothing cannot be empty, at least one field is required",
        ]
    );
}
