use rstest::rstest;
use taihe_sema::attributes::{AttrSchema, FieldSpec, ValueType};
use taihe_sema::ir::DeclTag;
use taihe_sema::syntax::{Attr, Enum, Expr, GlobalFunction, Parameter, Spec, TypeExpr};
use taihe_sema::{CompilerInstance, CompilerOptions, SourceFile};

use crate::helpers::*;

fn param_of(ty: TypeExpr) -> Spec {
    Spec::new().with_decl(GlobalFunction::new(
        "f",
        vec![Parameter::new("p", ty)],
        None,
    ))
}

fn array_of(item: &str) -> TypeExpr {
    TypeExpr::generic("Array", vec![TypeExpr::short(item)])
}

#[rstest]
#[case(array_of("u8"), "arraybuffer", None)]
#[case(
    array_of("String"),
    "arraybuffer",
    Some("Attribute 'arraybuffer' can only be attached to array types with byte items.")
)]
#[case(array_of("i64"), "bigint", None)]
#[case(
    array_of("f32"),
    "bigint",
    Some("Attribute 'bigint' can only be attached to array types with integer items.")
)]
#[case(array_of("f32"), "typedarray", None)]
#[case(
    TypeExpr::short("i32"),
    "fixedarray",
    Some("Attribute 'fixedarray' can only be attached to array types.")
)]
#[case(
    TypeExpr::generic("Map", vec![TypeExpr::short("String"), TypeExpr::short("i32")]),
    "record",
    None
)]
#[case(
    array_of("i32"),
    "record",
    Some("Attribute 'record' can only be attached to map types.")
)]
fn test_type_reference_attributes(
    #[case] ty: TypeExpr,
    #[case] attr: &str,
    #[case] error: Option<&str>,
) {
    let ci = compile(vec![("p", param_of(ty.with_attr(Attr::new(attr))))]);
    let expected: Vec<&str> = error.into_iter().collect();
    assert_eq!(errors(&ci), expected);
}

#[test]
fn test_unresolved_type_keeps_extra_checks_quiet() {
    let ty = TypeExpr::short("Missing").with_attr(Attr::new("arraybuffer"));
    let ci = compile(vec![("p", param_of(ty))]);
    assert_eq!(
        errors(&ci),
        vec!["declaration name 'Missing' is not declared or imported in this scope"]
    );
}

#[test]
fn test_wrong_target() {
    let spec = Spec::new().with_decl(
        GlobalFunction::new("f", vec![], None).with_attr(Attr::new("const")),
    );
    let ci = compile(vec![("p", spec)]);
    assert_eq!(
        errors(&ci),
        vec!["attribute const cannot be attached to function f"]
    );
}

#[test]
fn test_single_use_attribute_twice() {
    let spec = Spec::new().with_decl(
        GlobalFunction::new("f", vec![], None)
            .with_attr(Attr::new("rename").arg(Expr::str("a")))
            .with_attr(Attr::new("rename").arg(Expr::str("b"))),
    );
    let ci = compile(vec![("p", spec)]);
    assert_eq!(
        errors(&ci),
        vec!["cannot attach attribute rename(name=\"b\") due to conflict"]
    );
    let diag = &ci.diagnostics().diagnostics()[0];
    assert_eq!(
        diag.notes[0].message,
        "conflicting with attribute rename(name=\"a\")"
    );
}

#[test]
fn test_repeatable_attribute() {
    let spec = Spec::new()
        .with_inner_attr(Attr::new("sts_inject").arg(Expr::str("let a = 1;")))
        .with_inner_attr(Attr::new("sts_inject").arg(Expr::str("let b = 2;")));
    let ci = compile(vec![("p", spec)]);
    assert_no_errors(&ci);
    let pkg = ci.package_group().lookup("p").unwrap();
    let injected: Vec<&str> = ci
        .registry()
        .get_all(ci.package_group(), pkg, "sts_inject")
        .iter()
        .filter_map(|attr| attr.get_str("sts_code"))
        .collect();
    assert_eq!(injected, vec!["let a = 1;", "let b = 2;"]);
}

#[test]
fn test_group_members_exclude_each_other() {
    let spec = Spec::new().with_decl(
        GlobalFunction::new("f", vec![], None)
            .with_attr(Attr::new("static").arg(Expr::str("Shape")))
            .with_attr(Attr::new("ctor").arg(Expr::str("Shape"))),
    );
    let ci = compile(vec![("p", spec)]);
    let errors = errors(&ci);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|m| m.starts_with("cannot attach attribute")));
}

#[test]
fn test_custom_attribute() {
    let mut ci = CompilerInstance::new(CompilerOptions::default()).unwrap();
    ci.registry_mut()
        .register(
            AttrSchema::new("since")
                .on(DeclTag::Enum)
                .field(FieldSpec::required("version", ValueType::Int))
                .field(FieldSpec::optional("note", ValueType::Str).kw_only()),
        )
        .unwrap();
    let spec = Spec::new().with_decl(
        Enum::new("E", TypeExpr::short("i8"))
            .item("A", None)
            .with_attr(Attr::new("since").arg(Expr::int("12"))),
    );
    ci.add_source(SourceFile::new("p.taihe", spec));
    assert!(ci.run());
    let en = decl(&ci, "p", "E");
    let since = ci
        .registry()
        .get_single(ci.package_group(), en, "since")
        .unwrap();
    assert_eq!(since.get("version"), Some(&taihe_sema::ir::ConstValue::Int(12)));
    assert_eq!(since.get("note"), None);
}
