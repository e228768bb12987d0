use rstest::rstest;
use taihe_sema::CompilerInstance;
use taihe_sema::ir::{ConstValue, DeclKind};
use taihe_sema::syntax::{Enum, Expr, IntExpr, Spec, TypeExpr};

use crate::helpers::*;

fn enum_values(ci: &CompilerInstance, name: &str) -> Vec<Option<ConstValue>> {
    let pg = ci.package_group();
    let DeclKind::Enum(en) = pg.kind(decl(ci, "p", name)) else {
        panic!("{name} is not an enum");
    };
    en.items
        .iter()
        .map(|&item| match pg.kind(item) {
            DeclKind::EnumItem(it) => it.value.clone(),
            _ => None,
        })
        .collect()
}

#[test]
fn test_values_count_on_from_explicit_ones() {
    let en = Enum::new("Level", TypeExpr::short("i32"))
        .item("Low", None)
        .item("Mid", Some(Expr::int("10")))
        .item("High", None)
        .item(
            "Max",
            Some(Expr::Int(IntExpr::binary("<<", IntExpr::lit("1"), IntExpr::lit("4")))),
        );
    let ci = compile(vec![("p", Spec::new().with_decl(en))]);
    assert_no_errors(&ci);
    assert_eq!(
        enum_values(&ci, "Level"),
        vec![
            Some(ConstValue::Int(0)),
            Some(ConstValue::Int(10)),
            Some(ConstValue::Int(11)),
            Some(ConstValue::Int(16)),
        ]
    );
}

#[rstest]
#[case("u8", "255", 0)]
#[case("i8", "127", -128)]
#[case("u16", "65535", 0)]
fn test_values_wrap_at_the_top(#[case] ty: &str, #[case] last: &str, #[case] wrapped: i128) {
    let en = Enum::new("E", TypeExpr::short(ty))
        .item("Last", Some(Expr::int(last)))
        .item("Next", None);
    let ci = compile(vec![("p", Spec::new().with_decl(en))]);
    assert_no_errors(&ci);
    assert_eq!(enum_values(&ci, "E")[1], Some(ConstValue::Int(wrapped)));
}

#[test]
fn test_out_of_domain_value_is_reported() {
    let en = Enum::new("Small", TypeExpr::short("u8"))
        .item("A", Some(Expr::int("255")))
        .item("B", Some(Expr::int("256")))
        .item("C", None);
    let ci = compile(vec![("p", Spec::new().with_decl(en))]);
    assert_eq!(
        errors(&ci),
        vec!["value of enum item B (256) is conflict with enum Small (u8)"]
    );
    assert_eq!(
        enum_values(&ci, "Small"),
        vec![
            Some(ConstValue::Int(255)),
            Some(ConstValue::Int(0)),
            Some(ConstValue::Int(1)),
        ]
    );
}

#[test]
fn test_string_enum() {
    let en = Enum::new("Mode", TypeExpr::short("String"))
        .item("Read", None)
        .item("Write", Some(Expr::str("w")));
    let ci = compile(vec![("p", Spec::new().with_decl(en))]);
    assert_no_errors(&ci);
    assert_eq!(
        enum_values(&ci, "Mode"),
        vec![
            Some(ConstValue::Str("Read".into())),
            Some(ConstValue::Str("w".into())),
        ]
    );
}

#[test]
fn test_enum_over_struct_is_rejected() {
    let spec = Spec::new()
        .with_decl(plain_struct("Point"))
        .with_decl(Enum::new("E", TypeExpr::short("Point")).item("A", None));
    let ci = compile(vec![("p", spec)]);
    assert_eq!(errors(&ci), vec!["p.Point cannot be used in this context"]);
}

#[test]
fn test_division_by_zero_evaluates_to_zero() {
    let en = Enum::new("E", TypeExpr::short("i32")).item(
        "A",
        Some(Expr::Int(IntExpr::binary("/", IntExpr::lit("7"), IntExpr::lit("0")))),
    );
    let ci = compile(vec![("p", Spec::new().with_decl(en))]);
    assert_no_errors(&ci);
    assert_eq!(enum_values(&ci, "E"), vec![Some(ConstValue::Int(0))]);
}
